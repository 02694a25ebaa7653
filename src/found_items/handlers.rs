// src/found_items/handlers.rs

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
use super::services::FoundItemService;
use super::validators::FoundItemReportValidator;
use crate::auth::AuthedUser;
use crate::common::helpers::parse_form_bool;
use crate::common::{
    safe_email_log, total_pages, ApiError, AppState, ItemType, MultipartForm, Validator,
};
use crate::services::storage::UploadSession;

const FOUND_ITEMS_PREFIX: &str = "found-items";

/// POST /api/found-items - Report a found item (multipart)
pub async fn report_found_item(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let mut form = MultipartForm::read(&mut multipart).await?;
    let report = FoundItemReport {
        item_type: form.text("item_type"),
        description: form.text("description"),
        location: form.text("location"),
        date_found: form.text("date_found"),
        submitted_to_office: parse_form_bool(&form.text("submitted_to_office")),
        reporter_name: form.text("reporter_name"),
        reporter_email: form.text("reporter_email"),
        reporter_phone: form.text("reporter_phone"),
        picture: form.take_file("picture"),
    };

    let item = file_report(&state, &user.email, report).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Validates a report, stores its picture and inserts the row.
/// The picture is removed again if the insert fails.
pub async fn file_report(
    state: &AppState,
    found_by: &str,
    report: FoundItemReport,
) -> Result<FoundItem, ApiError> {
    let validation = FoundItemReportValidator.validate(&report);
    if !validation.is_valid {
        warn!(
            reporter = %safe_email_log(found_by),
            errors = ?validation.errors,
            "Found item report validation failed"
        );
        return Err(ApiError::from(validation));
    }

    let item_type: ItemType = report.item_type.parse().map_err(ApiError::BadRequest)?;
    let picture = report
        .picture
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("A picture of the item is required".to_string()))?;

    let mut uploads = UploadSession::new(state.storage.as_ref());
    let picture_url = match uploads.upload(FOUND_ITEMS_PREFIX, picture).await {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "Failed to upload found item picture");
            return Err(ApiError::UploadError("Failed to upload picture".to_string()));
        }
    };

    let service = FoundItemService::new(state.db.clone());
    match service.create(&report, item_type, &picture_url, found_by).await {
        Ok(item) => {
            info!(
                item_id = %item.id,
                reporter = %safe_email_log(found_by),
                "Found item report stored"
            );
            Ok(item)
        }
        Err(e) => {
            uploads.rollback().await;
            Err(e)
        }
    }
}

/// GET /api/found-items - Public gallery with type filter, search and pages of 9
pub async fn list_found_items(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<FoundItemQuery>,
) -> Result<Json<FoundItemListResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let item_type = match params.item_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(t) if t.eq_ignore_ascii_case("all") => None,
        Some(t) => Some(t.parse::<ItemType>().map_err(ApiError::BadRequest)?),
    };
    let page = params.page.unwrap_or(1).max(1);

    let (items, total) = FoundItemService::new(state.db.clone())
        .list_public(item_type, params.search.as_deref(), page)
        .await?;

    Ok(Json(FoundItemListResponse {
        items,
        total,
        page,
        page_size: PUBLIC_PAGE_SIZE,
        total_pages: total_pages(total, PUBLIC_PAGE_SIZE),
    }))
}

/// GET /api/found-items/:id - Single found item
pub async fn get_found_item(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(item_id): Path<String>,
) -> Result<Json<FoundItem>, ApiError> {
    let state = state_lock.read().await.clone();
    let item = FoundItemService::new(state.db.clone()).get(&item_id).await?;
    Ok(Json(item))
}

/// GET /api/admin/found-items - Admin listing
pub async fn admin_list_found_items(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(params): Query<AdminFoundItemQuery>,
) -> Result<Json<Vec<FoundItem>>, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let filter: AdminFoundItemFilter = params
        .filter
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(ApiError::BadRequest)?;

    let items = FoundItemService::new(state.db.clone())
        .list_admin(filter, params.search.as_deref())
        .await?;
    Ok(Json(items))
}

/// PATCH /api/admin/found-items/:id/status - Direct status correction
pub async fn admin_update_found_item_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateFoundItemStatusRequest>,
) -> Result<Json<FoundItem>, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let status: FoundItemStatus = request.status.parse().map_err(ApiError::BadRequest)?;

    info!(
        item_id = %item_id,
        status = %status,
        admin = %safe_email_log(&user.email),
        "Admin updating found item status"
    );

    let item = FoundItemService::new(state.db.clone())
        .update_status(&item_id, status)
        .await?;
    Ok(Json(item))
}
