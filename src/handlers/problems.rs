use axum::{Json, extract::State, http::HeaderMap};
use std::sync::Arc;

use crate::error::ApiError;
use crate::handlers::{resolve_user_id, run_job};
use crate::metrics::{PROBLEMS_GENERATED, QUOTA_IDENTITIES, QUOTA_REJECTIONS, REQUEST_TOTAL};
use crate::models::{GenerateProblemRequest, GenerateProblemResponse, TutorJob, TutorReply};
use crate::quota::QuotaDecision;
use crate::state::AppState;

pub async fn problem_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<GenerateProblemRequest>,
) -> Result<Json<GenerateProblemResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let user_id = resolve_user_id(&state, &headers);

    // quota is spent before any tutor work is queued
    let decision = state.quota.try_increment(&user_id);
    QUOTA_IDENTITIES.set(state.quota.tracked_identities() as f64);

    let current_count = match decision {
        QuotaDecision::Allowed { count } => count,
        QuotaDecision::QuotaExceeded { count, limit } => {
            QUOTA_REJECTIONS.inc();
            return Err(ApiError::QuotaExceeded {
                current_count: count,
                daily_limit: limit,
            });
        }
    };

    match run_job(&state, TutorJob::Problem(payload.difficulty)).await? {
        TutorReply::Problem(problem) => {
            PROBLEMS_GENERATED.inc();
            tracing::info!(
                user_id = %user_id,
                difficulty = payload.difficulty.as_str(),
                count = current_count,
                "problem generated"
            );
            Ok(Json(GenerateProblemResponse {
                problem,
                current_count,
                daily_limit: state.quota.daily_limit(),
            }))
        }
        TutorReply::Evaluation(_) => Err(ApiError::UnexpectedReply),
    }
}
