// src/claims/handlers.rs

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::evidence::{required_fields, ClaimEvidence};
use super::models::*;
use super::services::ClaimService;
use super::validators::ClaimSubmissionValidator;
use super::workflow::{self, ClaimDecision, ClaimStatus};
use crate::auth::AuthedUser;
use crate::common::{
    safe_email_log, ApiError, AppState, ItemType, MultipartForm, UploadedFile, Validator,
};
use crate::found_items::services::FoundItemService;
use crate::services::storage::{StorageError, UploadSession};

const ITEM_IMAGES_PREFIX: &str = "claims/items";
const CLAIMANT_PREFIX: &str = "claims/claimants";
const RECEIPT_PREFIX: &str = "claims/purchase-receipt";

/// POST /api/found-items/:id/claims - File an ownership claim (multipart)
pub async fn submit_claim_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(item_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let mut form = MultipartForm::read(&mut multipart).await?;
    let submission = ClaimSubmission {
        details: form.text("details"),
        extra_info: form.text("extra_info"),
        item_images: form.take_files("item_images"),
        claimant_images: form.take_files("claimant_image"),
        purchase_receipts: form.take_files("purchase_receipt"),
    };

    let claim = submit_claim(&state, &user.email, &item_id, submission).await?;
    Ok((StatusCode::CREATED, Json(claim)))
}

/// Files a claim on a found item.
///
/// Order: the item must exist and not be handed over, the form must be
/// valid, then item images, claimant picture and receipt are stored. The
/// claim row and the item status change are written together last. Any
/// failure after the first upload deletes what was stored.
pub async fn submit_claim(
    state: &AppState,
    claimant_email: &str,
    item_id: &str,
    submission: ClaimSubmission,
) -> Result<Claim, ApiError> {
    let item = FoundItemService::new(state.db.clone()).get(item_id).await?;
    workflow::ensure_claimable(item.status)?;

    let validation = ClaimSubmissionValidator {
        item_type: item.item_type,
    }
    .validate(&submission);
    if !validation.is_valid {
        warn!(
            item_id = %item_id,
            claimant = %safe_email_log(claimant_email),
            errors = ?validation.errors,
            "Claim validation failed"
        );
        return Err(ApiError::from(validation));
    }

    let evidence = ClaimEvidence::parse(item.item_type, &submission.extra_info)?;
    let extra_info_json = evidence
        .to_json()
        .map_err(|e| ApiError::InternalServer(format!("Failed to encode evidence: {}", e)))?;

    let mut uploads = UploadSession::new(state.storage.as_ref());

    let item_image_urls = match uploads
        .upload_all(ITEM_IMAGES_PREFIX, &submission.item_images)
        .await
    {
        Ok(urls) => urls,
        Err(e) => {
            error!(error = %e, item_id = %item_id, "Failed to upload claim item images");
            uploads.rollback().await;
            return Err(ApiError::UploadError("Failed to upload item images".to_string()));
        }
    };

    let claimant_image_url = match upload_single(
        &mut uploads,
        CLAIMANT_PREFIX,
        &submission.claimant_images,
    )
    .await
    {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, item_id = %item_id, "Failed to upload claimant picture");
            uploads.rollback().await;
            return Err(ApiError::UploadError("Failed to upload claimant picture".to_string()));
        }
    };

    let purchase_receipt_url = match upload_single(
        &mut uploads,
        RECEIPT_PREFIX,
        &submission.purchase_receipts,
    )
    .await
    {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, item_id = %item_id, "Failed to upload purchase receipt");
            uploads.rollback().await;
            return Err(ApiError::UploadError("Failed to upload purchase receipt".to_string()));
        }
    };

    let new_claim = NewClaim {
        item_id: item.id.clone(),
        claimant_email: claimant_email.to_string(),
        details: submission.details,
        item_image_urls,
        claimant_image_url,
        purchase_receipt_url,
        item_type: item.item_type,
        extra_info_json,
    };

    match ClaimService::new(state.db.clone())
        .create_with_item_update(new_claim)
        .await
    {
        Ok(claim) => Ok(claim),
        Err(e) => {
            error!(error = %e, item_id = %item_id, "Failed to record claim");
            uploads.rollback().await;
            Err(e)
        }
    }
}

async fn upload_single(
    uploads: &mut UploadSession<'_>,
    prefix: &str,
    files: &[UploadedFile],
) -> Result<String, StorageError> {
    let file = files
        .first()
        .ok_or_else(|| StorageError::UploadFailed(format!("no file for {}", prefix)))?;
    uploads.upload(prefix, file).await
}

/// GET /api/claims/questions?item_type= - Evidence keys a claimant must answer
pub async fn claim_questions(
    Query(params): Query<ClaimQuestionsQuery>,
) -> Result<Json<Value>, ApiError> {
    let item_type: ItemType = params.item_type.parse().map_err(ApiError::BadRequest)?;
    Ok(Json(json!({
        "item_type": item_type,
        "fields": required_fields(item_type),
    })))
}

/// GET /api/admin/claims - All claims, newest first
pub async fn admin_list_claims(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(params): Query<AdminClaimQuery>,
) -> Result<Json<Vec<ClaimDetail>>, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) if s.eq_ignore_ascii_case("all") => None,
        Some(s) => Some(s.parse::<ClaimStatus>().map_err(ApiError::BadRequest)?),
    };

    let claims = ClaimService::new(state.db.clone()).list(status).await?;
    Ok(Json(claims))
}

/// GET /api/admin/claims/:id - Claim with its item summary
pub async fn admin_get_claim(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(claim_id): Path<String>,
) -> Result<Json<ClaimDetail>, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let claim = ClaimService::new(state.db.clone())
        .get_detail(&claim_id)
        .await?;
    Ok(Json(claim))
}

/// PATCH /api/admin/claims/:id/status - Approve or reject a pending claim
pub async fn admin_adjudicate_claim(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(claim_id): Path<String>,
    Json(request): Json<AdjudicateClaimRequest>,
) -> Result<Json<Claim>, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let decision: ClaimDecision = request.status.parse().map_err(ApiError::BadRequest)?;

    info!(
        claim_id = %claim_id,
        decision = ?decision,
        admin = %safe_email_log(&user.email),
        "Admin adjudicating claim"
    );

    let claim = ClaimService::new(state.db.clone())
        .adjudicate(&claim_id, decision, &user.email)
        .await?;
    Ok(Json(claim))
}
