use super::handlers;
use axum::{
    routing::{get, patch},
    Router,
};

/// Creates the found-items router
pub fn found_items_routes() -> Router {
    Router::new()
        .route(
            "/api/found-items",
            get(handlers::list_found_items).post(handlers::report_found_item),
        )
        .route("/api/found-items/:id", get(handlers::get_found_item))
        .route("/api/admin/found-items", get(handlers::admin_list_found_items))
        .route(
            "/api/admin/found-items/:id/status",
            patch(handlers::admin_update_found_item_status),
        )
}
