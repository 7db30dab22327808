pub mod error;
mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::detector::RepositoryApiDetector;
use crate::storage::ContentCache;

pub use error::ApiError;

/// Shared state injected into every handler. Constructed once at
/// startup; tests build their own with temp directories and fresh
/// caches.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ContentCache>,
    pub detector: Arc<RepositoryApiDetector>,
    pub repos_dir: PathBuf,
}

impl AppState {
    pub fn new(
        cache: Arc<ContentCache>,
        detector: Arc<RepositoryApiDetector>,
        repos_dir: PathBuf,
    ) -> Self {
        Self {
            cache,
            detector,
            repos_dir,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/detect-apis", get(handlers::detect_all))
        .route("/detect-apis/:repo_name", get(handlers::detect_repository))
        .route("/api-buttons/:repo_name", get(handlers::api_buttons))
        .route("/api-explorer/all", get(handlers::api_explorer))
        .route("/repository/:repo_name/apis", get(handlers::repository_apis))
        .route("/repository/:repo_name/files", get(handlers::repository_files))
        .route("/repository/:repo_name/file", get(handlers::repository_file))
        .route("/cache/stats", get(handlers::cache_stats))
        .route("/cache/clear", post(handlers::cache_clear))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
