// src/admin/handlers/dashboard.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::admin::models::DashboardMetrics;
use crate::admin::services::DashboardService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /api/admin/dashboard - Item, claim and user counts
pub async fn get_dashboard_metrics(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<DashboardMetrics>, ApiError> {
    authed.require_admin()?;
    let state = state_lock.read().await.clone();

    info!(admin_user_id = %authed.id, "Fetching dashboard metrics");

    let metrics = DashboardService::new(state.db.clone()).metrics().await?;
    Ok(Json(metrics))
}
