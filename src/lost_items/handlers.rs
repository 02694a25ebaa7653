// src/lost_items/handlers.rs

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::*;
use super::services::LostItemService;
use super::validators::LostItemReportValidator;
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState, ItemType, MultipartForm, Validator};
use crate::services::storage::UploadSession;

const LOST_ITEMS_PREFIX: &str = "lost-items";
const PROOFS_PREFIX: &str = "lost-items/proofs";

/// POST /api/lost-items - Report a lost item (multipart)
pub async fn report_lost_item(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let mut form = MultipartForm::read(&mut multipart).await?;
    let report = LostItemReport {
        item_name: form.text("item_name"),
        item_type: form.text("item_type"),
        description: form.text("description"),
        location: form.text("location"),
        date_lost: form.text("date_lost"),
        reporter_name: form.text("reporter_name"),
        reporter_phone: form.text("reporter_phone"),
        pictures: form.take_files("pictures"),
        proof: form.take_file("proof"),
    };

    let item = file_report(&state, &user.email, report).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Validates a report, stores pictures and proof, and inserts the row.
/// Stored files are removed again if a later step fails.
pub async fn file_report(
    state: &AppState,
    reporter_email: &str,
    report: LostItemReport,
) -> Result<LostItem, ApiError> {
    let validation = LostItemReportValidator.validate(&report);
    if !validation.is_valid {
        warn!(
            reporter = %safe_email_log(reporter_email),
            errors = ?validation.errors,
            "Lost item report validation failed"
        );
        return Err(ApiError::from(validation));
    }

    let item_type: ItemType = report.item_type.parse().map_err(ApiError::BadRequest)?;
    let mut uploads = UploadSession::new(state.storage.as_ref());

    let picture_urls = match uploads.upload_all(LOST_ITEMS_PREFIX, &report.pictures).await {
        Ok(urls) => urls,
        Err(e) => {
            error!(error = %e, "Failed to upload lost item pictures");
            uploads.rollback().await;
            return Err(ApiError::UploadError("Failed to upload pictures".to_string()));
        }
    };

    let proof_url = match &report.proof {
        Some(proof) => match uploads.upload(PROOFS_PREFIX, proof).await {
            Ok(url) => Some(url),
            Err(e) => {
                error!(error = %e, "Failed to upload proof of ownership");
                uploads.rollback().await;
                return Err(ApiError::UploadError("Failed to upload proof".to_string()));
            }
        },
        None => None,
    };

    let service = LostItemService::new(state.db.clone());
    match service
        .create(&report, item_type, &picture_urls, proof_url.as_deref(), reporter_email)
        .await
    {
        Ok(item) => {
            info!(item_id = %item.id, reporter = %safe_email_log(reporter_email), "Lost item report stored");
            Ok(item)
        }
        Err(e) => {
            uploads.rollback().await;
            Err(e)
        }
    }
}

/// GET /api/admin/lost-items - Admin listing
pub async fn admin_list_lost_items(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(params): Query<AdminLostItemQuery>,
) -> Result<Json<Vec<LostItem>>, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) if s.eq_ignore_ascii_case("all") => None,
        Some(s) => Some(s.parse::<LostItemStatus>().map_err(ApiError::BadRequest)?),
    };

    let items = LostItemService::new(state.db.clone())
        .list_admin(status, params.search.as_deref())
        .await?;
    Ok(Json(items))
}

/// PATCH /api/admin/lost-items/:id/status - Direct status correction
pub async fn admin_update_lost_item_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateLostItemStatusRequest>,
) -> Result<Json<LostItem>, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let status: LostItemStatus = request.status.parse().map_err(ApiError::BadRequest)?;

    info!(
        item_id = %item_id,
        status = %status,
        admin = %safe_email_log(&user.email),
        "Admin updating lost item status"
    );

    let item = LostItemService::new(state.db.clone())
        .update_status(&item_id, status)
        .await?;
    Ok(Json(item))
}
