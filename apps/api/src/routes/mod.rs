pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::search::handlers as search;
use crate::state::AppState;
use crate::wipe::handlers as wipe;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job search
        .route("/api/job-search", get(search::handle_job_search))
        // Data management
        .route("/api/v1/wipe/files", get(wipe::handle_list_files))
        .route("/api/v1/wipe", post(wipe::handle_wipe))
        .with_state(state)
}
