pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::form::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Upload page
        .route("/", get(handlers::handle_page))
        .route("/upload", post(handlers::handle_upload))
        // JSON API over the same form state
        .route("/api/file", post(handlers::handle_select_file))
        .route("/api/submit", post(handlers::handle_submit))
        .route("/api/state", get(handlers::handle_state))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
