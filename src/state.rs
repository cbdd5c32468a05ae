use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use crate::cache::CacheEntry;
use crate::models::QueuedJob;
use crate::quota::DailyQuotaTracker;
use crate::tutor::TranslationTutor;
use crate::worker::tutor_worker;

// How a request is mapped to a quota identity
#[derive(Debug, Clone)]
pub struct IdentityPolicy {
    pub default_user: String,
    pub trust_user_header: bool, // honour x-user-id; off unless a trusted proxy sets it
}

impl IdentityPolicy {
    pub fn single_user(default_user: impl Into<String>) -> Self {
        Self {
            default_user: default_user.into(),
            trust_user_header: false,
        }
    }
}

// app's shared state

pub struct AppState {
    pub quota: DailyQuotaTracker,
    pub identity: IdentityPolicy,
    pub cache: Arc<DashMap<String, CacheEntry>>, // evaluation cache
    pub ttl: Duration,                  // how long cached evaluations stay valid
    pub job_tx: mpsc::Sender<QueuedJob>,
}

impl AppState {
    /// Builds the state and spawns the tutor worker on the current runtime.
    pub fn spawn(
        quota: DailyQuotaTracker,
        tutor: Arc<dyn TranslationTutor>,
        identity: IdentityPolicy,
        ttl: Duration,
        queue_size: usize,
    ) -> Arc<Self> {
        let (job_tx, job_rx) = mpsc::channel::<QueuedJob>(queue_size.max(1));
        let cache = Arc::new(DashMap::new());

        tokio::spawn(tutor_worker(job_rx, tutor, cache.clone(), ttl));

        Arc::new(Self {
            quota,
            identity,
            cache,
            ttl,
            job_tx,
        })
    }
}
