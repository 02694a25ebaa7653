use super::handlers;
use axum::{
    routing::{get, patch, post},
    Router,
};

/// Creates the lost-items router
pub fn lost_items_routes() -> Router {
    Router::new()
        .route("/api/lost-items", post(handlers::report_lost_item))
        .route("/api/admin/lost-items", get(handlers::admin_list_lost_items))
        .route(
            "/api/admin/lost-items/:id/status",
            patch(handlers::admin_update_lost_item_status),
        )
}
