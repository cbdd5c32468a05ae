mod evaluate;
mod health;
mod metrics;
mod problems;
mod usage;

pub use evaluate::evaluate_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use problems::problem_handler;
pub use usage::usage_handler;

use axum::http::HeaderMap;
use std::time::Instant;
use tokio::sync::oneshot;

use crate::error::ApiError;
use crate::metrics::TUTOR_LATENCY;
use crate::models::{QueuedJob, TutorJob, TutorReply};
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

// Quota identity: the configured default, or x-user-id when the header is trusted
pub(crate) fn resolve_user_id(state: &AppState, headers: &HeaderMap) -> String {
    let policy = &state.identity;
    if !policy.trust_user_header {
        return policy.default_user.clone();
    }

    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| policy.default_user.clone())
}

// Queue a job for the tutor worker and wait for its reply
pub(crate) async fn run_job(state: &AppState, job: TutorJob) -> Result<TutorReply, ApiError> {
    let start_time = Instant::now();
    let (response_tx, response_rx) = oneshot::channel();

    state
        .job_tx
        .send(QueuedJob { job, response_tx })
        .await
        .map_err(|_| ApiError::QueueClosed)?;

    let reply = response_rx.await.map_err(|_| ApiError::WorkerDropped)?;

    TUTOR_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(reply?)
}
