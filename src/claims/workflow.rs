// src/claims/workflow.rs
//! Claim and found-item state transitions.
//!
//! ```text
//! FoundItem: reported | submitted -> claim submitted -> claimed
//! Claim:     (none) -> pending -> approved | rejected
//! ```
//!
//! Pure functions only; the service layer applies the results inside a
//! database transaction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::common::ApiError;
use crate::found_items::FoundItemStatus;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(format!(
                "Invalid status '{}'. Must be one of: pending, approved, rejected",
                other
            )),
        }
    }
}

/// An administrator's verdict on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    Approve,
    Reject,
}

impl FromStr for ClaimDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(ClaimDecision::Approve),
            "rejected" => Ok(ClaimDecision::Reject),
            other => Err(format!(
                "Invalid decision '{}'. Must be 'approved' or 'rejected'",
                other
            )),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Item has already been claimed")]
    ItemAlreadyClaimed,

    #[error("Claim has already been {0}")]
    AlreadyDecided(ClaimStatus),
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Conflict(err.to_string())
    }
}

/// Result of adjudicating a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjudication {
    pub claim: ClaimStatus,
    /// New status for the found item, `None` when it stays as is
    pub item: Option<FoundItemStatus>,
}

/// New claims are accepted until the item is handed over
pub fn ensure_claimable(item_status: FoundItemStatus) -> Result<(), WorkflowError> {
    match item_status {
        FoundItemStatus::Claimed => Err(WorkflowError::ItemAlreadyClaimed),
        FoundItemStatus::Reported
        | FoundItemStatus::Submitted
        | FoundItemStatus::ClaimSubmitted => Ok(()),
    }
}

/// Found-item status after a claim is filed
pub fn item_status_after_submission() -> FoundItemStatus {
    FoundItemStatus::ClaimSubmitted
}

/// Only pending claims can be decided; approval hands the item over
pub fn adjudicate(
    current: ClaimStatus,
    decision: ClaimDecision,
) -> Result<Adjudication, WorkflowError> {
    if current != ClaimStatus::Pending {
        return Err(WorkflowError::AlreadyDecided(current));
    }

    Ok(match decision {
        ClaimDecision::Approve => Adjudication {
            claim: ClaimStatus::Approved,
            item: Some(FoundItemStatus::Claimed),
        },
        ClaimDecision::Reject => Adjudication {
            claim: ClaimStatus::Rejected,
            item: None,
        },
    })
}
