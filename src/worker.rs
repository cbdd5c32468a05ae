use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use crate::cache::{CacheEntry, make_cache_key};
use crate::claude::ClaudeApiError;
use crate::metrics::{EVAL_CACHE_HITS, EVAL_CACHE_MISSES, EVAL_CACHE_SIZE};
use crate::models::{EvaluateRequest, QueuedJob, TutorJob, TutorReply};
use crate::tutor::TranslationTutor;


pub async fn tutor_worker(
    mut rx: mpsc::Receiver<QueuedJob>,
    tutor: Arc<dyn TranslationTutor>,
    cache: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
) {
    tracing::info!("Tutor worker started - processing jobs sequentially");

    // keep receiving jobs until every sender is gone
    while let Some(queued) = rx.recv().await {
        let reply = match queued.job {
            TutorJob::Problem(difficulty) => tutor
                .generate_problem(difficulty)
                .await
                .map(TutorReply::Problem),
            TutorJob::Evaluate(request) => evaluate_cached(tutor.as_ref(), &cache, ttl, request)
                .await
                .map(TutorReply::Evaluation),
        };

        if let Err(e) = &reply {
            tracing::warn!("[Worker] tutor call failed: {}", e);
        }

        // receiver may have gone away (client disconnected)
        let _ = queued.response_tx.send(reply);
    }

    tracing::info!("Tutor worker stopped");
}

async fn evaluate_cached(
    tutor: &dyn TranslationTutor,
    cache: &DashMap<String, CacheEntry>,
    ttl: Duration,
    request: EvaluateRequest,
) -> Result<crate::models::Evaluation, ClaudeApiError> {
    let cache_key = make_cache_key(&request);

    // check cache first
    if let Some(entry) = cache.get(&cache_key) {
        if entry.is_fresh(ttl) {
            EVAL_CACHE_HITS.inc();
            tracing::debug!("[Worker] Cache HIT");
            return Ok(entry.evaluation.clone());
        }
    }
    EVAL_CACHE_MISSES.inc();

    let evaluation = tutor.evaluate(&request).await?;

    cache.insert(cache_key, CacheEntry::new(evaluation.clone()));
    cache.retain(|_, entry| entry.is_fresh(ttl));
    EVAL_CACHE_SIZE.set(cache.len() as f64);

    Ok(evaluation)
}
