pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate mode
        .route(
            "/api/v1/candidates/score",
            post(handlers::handle_candidate_score),
        )
        .route(
            "/api/v1/candidates/score/upload",
            post(handlers::handle_candidate_upload),
        )
        .route(
            "/api/v1/candidates/:name/history",
            get(handlers::handle_candidate_history),
        )
        // Recruiter mode
        .route("/api/v1/recruiter/rank", post(handlers::handle_recruiter_rank))
        .route(
            "/api/v1/recruiter/rank/upload",
            post(handlers::handle_recruiter_upload),
        )
        .layer(body_limit)
        .with_state(state)
}
