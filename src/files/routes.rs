use super::handlers;
use axum::{routing::get, Router};

/// Creates the local uploads router
pub fn files_routes() -> Router {
    Router::new().route("/api/uploads/*key", get(handlers::serve_upload))
}
