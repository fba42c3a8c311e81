pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/requirements/analyze",
            post(handlers::handle_analyze),
        )
        .route("/api/v1/rankings", post(handlers::handle_rank))
        .route("/api/v1/rankings/single", post(handlers::handle_rank_single))
        .with_state(state)
}
