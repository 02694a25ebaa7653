// src/claims/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::workflow::ClaimStatus;
use crate::common::helpers::{serialize_json_text, serialize_url_list};
use crate::common::{ItemType, UploadedFile};
use crate::found_items::FoundItemStatus;

pub const MAX_ITEM_IMAGES: usize = 3;

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Claim {
    pub id: String,
    pub item_id: String,
    pub claimant_email: String,
    pub details: String,
    #[serde(serialize_with = "serialize_url_list")]
    pub item_images: String, // JSON array in DB
    pub claimant_image: String,
    pub purchase_receipt: String,
    pub item_type: ItemType,
    pub status: ClaimStatus,
    #[serde(serialize_with = "serialize_json_text")]
    pub extra_info: String, // JSON object in DB
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
}

/// Claim joined with the found item it refers to (admin views)
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct ClaimDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub claim: Claim,
    pub item_description: Option<String>,
    pub item_location: Option<String>,
    pub item_status: Option<FoundItemStatus>,
}

/// Fields of the claim form
#[derive(Debug, Clone, Default)]
pub struct ClaimSubmission {
    pub details: String,
    /// JSON text with the per-type answers
    pub extra_info: String,
    pub item_images: Vec<UploadedFile>,
    pub claimant_images: Vec<UploadedFile>,
    pub purchase_receipts: Vec<UploadedFile>,
}

/// Row written when a claim is filed
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub item_id: String,
    pub claimant_email: String,
    pub details: String,
    pub item_image_urls: Vec<String>,
    pub claimant_image_url: String,
    pub purchase_receipt_url: String,
    pub item_type: ItemType,
    pub extra_info_json: String,
}

#[derive(Deserialize, Debug)]
pub struct AdjudicateClaimRequest {
    pub status: String,
}

/// GET /api/admin/claims query string
#[derive(Deserialize, Debug, Default)]
pub struct AdminClaimQuery {
    pub status: Option<String>,
}

/// GET /api/claims/questions query string
#[derive(Deserialize, Debug)]
pub struct ClaimQuestionsQuery {
    pub item_type: String,
}
