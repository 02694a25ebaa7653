// src/admin/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn admin_routes() -> Router {
    Router::new()
        .route(
            "/api/admin/dashboard",
            get(handlers::dashboard::get_dashboard_metrics),
        )
        .route("/api/admin/users", get(handlers::users::get_admin_users))
}
