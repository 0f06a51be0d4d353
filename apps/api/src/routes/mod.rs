pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis;
use crate::evaluation;
use crate::questions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route(
            "/api/interview/evaluate-delivery",
            post(analysis::handlers::handle_evaluate_delivery),
        )
        .route(
            "/api/interview/evaluate",
            post(evaluation::handlers::handle_evaluate),
        )
        .route(
            "/api/interview/generate-questions",
            post(questions::handlers::handle_generate_questions),
        )
        .with_state(state)
}
