pub mod cache;
pub mod claude;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod quota;
pub mod state;
pub mod tutor;
pub mod worker;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::handlers::{evaluate_handler, health_handler, metrics_handler, problem_handler, usage_handler};
use crate::state::AppState;

// Router with every route the trainer front end calls
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/usage", get(usage_handler))
        .route("/api/problems", post(problem_handler))
        .route("/api/evaluate", post(evaluate_handler))
        .with_state(state)
}
