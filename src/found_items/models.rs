// src/found_items/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::common::{ItemType, UploadedFile};

/// Public listing page size
pub const PUBLIC_PAGE_SIZE: i64 = 9;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundItemStatus {
    #[sqlx(rename = "reported")]
    #[serde(rename = "reported")]
    Reported,
    #[sqlx(rename = "submitted")]
    #[serde(rename = "submitted")]
    Submitted,
    #[sqlx(rename = "claim submitted")]
    #[serde(rename = "claim submitted")]
    ClaimSubmitted,
    #[sqlx(rename = "claimed")]
    #[serde(rename = "claimed")]
    Claimed,
}

impl FoundItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoundItemStatus::Reported => "reported",
            FoundItemStatus::Submitted => "submitted",
            FoundItemStatus::ClaimSubmitted => "claim submitted",
            FoundItemStatus::Claimed => "claimed",
        }
    }

    /// Status a new report starts in
    pub fn initial(submitted_to_office: bool) -> Self {
        if submitted_to_office {
            FoundItemStatus::Submitted
        } else {
            FoundItemStatus::Reported
        }
    }
}

impl fmt::Display for FoundItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoundItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reported" => Ok(FoundItemStatus::Reported),
            "submitted" => Ok(FoundItemStatus::Submitted),
            "claim submitted" | "claim_submitted" => Ok(FoundItemStatus::ClaimSubmitted),
            "claimed" => Ok(FoundItemStatus::Claimed),
            other => Err(format!(
                "Invalid status '{}'. Must be one of: reported, submitted, claim submitted, claimed",
                other
            )),
        }
    }
}

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct FoundItem {
    pub id: String,
    pub item_type: ItemType,
    pub description: String,
    pub location_found: String,
    pub date_found: String,
    pub picture_url: Option<String>,
    pub submitted_to_office: bool,
    pub found_by: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reporter_phone: String,
    pub status: FoundItemStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields of the found-item report form
#[derive(Debug, Clone, Default)]
pub struct FoundItemReport {
    pub item_type: String,
    pub description: String,
    pub location: String,
    pub date_found: String,
    pub submitted_to_office: bool,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reporter_phone: String,
    pub picture: Option<UploadedFile>,
}

/// GET /api/found-items query string
#[derive(Deserialize, Debug, Default)]
pub struct FoundItemQuery {
    pub item_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
}

/// Office-delivery filter used by the admin listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminFoundItemFilter {
    All,
    Submitted,
    NotSubmitted,
    Claimed,
}

impl FromStr for AdminFoundItemFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(AdminFoundItemFilter::All),
            "submitted" => Ok(AdminFoundItemFilter::Submitted),
            "not_submitted" => Ok(AdminFoundItemFilter::NotSubmitted),
            "claimed" => Ok(AdminFoundItemFilter::Claimed),
            other => Err(format!(
                "Invalid filter '{}'. Must be one of: all, submitted, not_submitted, claimed",
                other
            )),
        }
    }
}

/// GET /api/admin/found-items query string
#[derive(Deserialize, Debug, Default)]
pub struct AdminFoundItemQuery {
    pub filter: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateFoundItemStatusRequest {
    pub status: String,
}

#[derive(Serialize, Debug)]
pub struct FoundItemListResponse {
    pub items: Vec<FoundItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}
