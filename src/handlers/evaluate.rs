use axum::{Json, extract::State};
use std::sync::Arc;

use crate::error::ApiError;
use crate::handlers::run_job;
use crate::metrics::REQUEST_TOTAL;
use crate::models::{EvaluateRequest, Evaluation, TutorJob, TutorReply};
use crate::state::AppState;

// Grading is not quota-gated
pub async fn evaluate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<Evaluation>, ApiError> {
    REQUEST_TOTAL.inc();

    if payload.japanese.trim().is_empty() {
        return Err(ApiError::BadRequest("japanese must not be empty".to_string()));
    }
    if payload.user_translation.trim().is_empty() {
        return Err(ApiError::BadRequest("userTranslation must not be empty".to_string()));
    }

    match run_job(&state, TutorJob::Evaluate(payload)).await? {
        TutorReply::Evaluation(evaluation) => Ok(Json(evaluation)),
        TutorReply::Problem(_) => Err(ApiError::UnexpectedReply),
    }
}
