// src/admin/handlers/users.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::auth::services::UserService;
use crate::auth::{AuthedUser, User};
use crate::common::{ApiError, AppState};

/// GET /api/admin/users - Everyone who has signed in
pub async fn get_admin_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<User>>, ApiError> {
    authed.require_admin()?;
    let state = state_lock.read().await.clone();

    let users = UserService::new(state.db.clone()).list_users().await?;
    info!(admin_user_id = %authed.id, count = users.len(), "Listed users");
    Ok(Json(users))
}
