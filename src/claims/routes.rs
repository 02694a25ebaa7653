use super::handlers;
use axum::{
    routing::{get, patch, post},
    Router,
};

/// Creates the claims router
pub fn claims_routes() -> Router {
    Router::new()
        .route(
            "/api/found-items/:id/claims",
            post(handlers::submit_claim_handler),
        )
        .route("/api/claims/questions", get(handlers::claim_questions))
        .route("/api/admin/claims", get(handlers::admin_list_claims))
        .route("/api/admin/claims/:id", get(handlers::admin_get_claim))
        .route(
            "/api/admin/claims/:id/status",
            patch(handlers::admin_adjudicate_claim),
        )
}
