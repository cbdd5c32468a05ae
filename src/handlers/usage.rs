use axum::{Json, extract::State, http::HeaderMap};
use std::sync::Arc;

use crate::handlers::resolve_user_id;
use crate::models::UsageResponse;
use crate::state::AppState;

// Read-only: reports today's count without spending quota
pub async fn usage_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<UsageResponse> {
    let user_id = resolve_user_id(&state, &headers);
    let current_count = state.quota.get_count(&user_id);
    let remaining = state.quota.remaining(&user_id);

    Json(UsageResponse {
        user_id,
        current_count,
        daily_limit: state.quota.daily_limit(),
        remaining,
        daily_limit_reached: remaining == 0,
    })
}
