// src/lost_items/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::common::helpers::serialize_url_list;
use crate::common::{ItemType, UploadedFile};

pub const MAX_LOST_ITEM_PICTURES: usize = 3;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LostItemStatus {
    Reported,
    NotFound,
    Found,
    Claimed,
}

impl LostItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LostItemStatus::Reported => "reported",
            LostItemStatus::NotFound => "not_found",
            LostItemStatus::Found => "found",
            LostItemStatus::Claimed => "claimed",
        }
    }
}

impl fmt::Display for LostItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LostItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reported" => Ok(LostItemStatus::Reported),
            "not_found" | "not found" => Ok(LostItemStatus::NotFound),
            "found" => Ok(LostItemStatus::Found),
            "claimed" => Ok(LostItemStatus::Claimed),
            other => Err(format!(
                "Invalid status '{}'. Must be one of: reported, not_found, found, claimed",
                other
            )),
        }
    }
}

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct LostItem {
    pub id: String,
    pub item_name: String,
    pub item_type: ItemType,
    pub description: String,
    pub location: String,
    pub date_lost: String,
    #[serde(serialize_with = "serialize_url_list")]
    pub picture_urls: String, // JSON array in DB
    pub proof_url: Option<String>,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reporter_phone: String,
    pub status: LostItemStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields of the lost-item report form
#[derive(Debug, Clone, Default)]
pub struct LostItemReport {
    pub item_name: String,
    pub item_type: String,
    pub description: String,
    pub location: String,
    pub date_lost: String,
    pub reporter_name: String,
    pub reporter_phone: String,
    pub pictures: Vec<UploadedFile>,
    pub proof: Option<UploadedFile>,
}

/// GET /api/admin/lost-items query string
#[derive(Deserialize, Debug, Default)]
pub struct AdminLostItemQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateLostItemStatusRequest {
    pub status: String,
}
