use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{Claim, ClaimDetail, NewClaim};
use super::workflow::{self, ClaimDecision, ClaimStatus, WorkflowError};
use crate::common::{generate_claim_id, safe_email_log, ApiError};
use crate::found_items::FoundItemStatus;

const DETAIL_SELECT: &str = r#"
    SELECT c.*,
           f.description AS item_description,
           f.location_found AS item_location,
           f.status AS item_status
    FROM claims c
    LEFT JOIN found_items f ON f.id = c.item_id
"#;

pub struct ClaimService {
    db: SqlitePool,
}

impl ClaimService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts the claim and marks the item `claim submitted` in one transaction.
    /// The item is re-read inside the transaction so a hand-over that raced
    /// this submission is still refused.
    pub async fn create_with_item_update(&self, new_claim: NewClaim) -> Result<Claim, ApiError> {
        let id = generate_claim_id();
        let now = chrono::Utc::now().to_rfc3339();
        let images_json = serde_json::to_string(&new_claim.item_image_urls)
            .map_err(|e| ApiError::InternalServer(format!("Failed to encode image list: {}", e)))?;

        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        let item_status: Option<FoundItemStatus> =
            sqlx::query_scalar("SELECT status FROM found_items WHERE id = ?")
                .bind(&new_claim.item_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;

        let item_status = item_status.ok_or_else(|| {
            ApiError::NotFound(format!("Found item not found: {}", new_claim.item_id))
        })?;
        workflow::ensure_claimable(item_status)?;

        sqlx::query(
            r#"
            INSERT INTO claims (
                id, item_id, claimant_email, details, item_images, claimant_image,
                purchase_receipt, item_type, status, extra_info, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new_claim.item_id)
        .bind(&new_claim.claimant_email)
        .bind(new_claim.details.trim())
        .bind(&images_json)
        .bind(&new_claim.claimant_image_url)
        .bind(&new_claim.purchase_receipt_url)
        .bind(new_claim.item_type)
        .bind(ClaimStatus::Pending)
        .bind(&new_claim.extra_info_json)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        sqlx::query("UPDATE found_items SET status = ?, updated_at = ? WHERE id = ?")
            .bind(workflow::item_status_after_submission())
            .bind(&now)
            .bind(&new_claim.item_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(
            claim_id = %id,
            item_id = %new_claim.item_id,
            claimant = %safe_email_log(&new_claim.claimant_email),
            item_type = %new_claim.item_type,
            "Claim submitted"
        );

        self.get(&id).await
    }

    /// Applies an administrator's decision to a pending claim.
    ///
    /// The claim update is conditional on the claim still being pending, so
    /// of two concurrent decisions exactly one wins and the other gets 409.
    /// Approval also hands the item over in the same transaction.
    pub async fn adjudicate(
        &self,
        claim_id: &str,
        decision: ClaimDecision,
        reviewer_email: &str,
    ) -> Result<Claim, ApiError> {
        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        let current: Option<(ClaimStatus, String)> =
            sqlx::query_as("SELECT status, item_id FROM claims WHERE id = ?")
                .bind(claim_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;

        let (current_status, item_id) =
            current.ok_or_else(|| ApiError::NotFound(format!("Claim not found: {}", claim_id)))?;

        let outcome = workflow::adjudicate(current_status, decision)?;
        let now = chrono::Utc::now().to_rfc3339();

        let updated = sqlx::query(
            r#"
            UPDATE claims
            SET status = ?, reviewed_by = ?, reviewed_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(outcome.claim)
        .bind(reviewer_email)
        .bind(&now)
        .bind(claim_id)
        .bind(ClaimStatus::Pending)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        if updated.rows_affected() == 0 {
            warn!(claim_id = %claim_id, "Claim was decided concurrently");
            return Err(ApiError::Conflict("Claim has already been decided".to_string()));
        }

        if let Some(item_status) = outcome.item {
            // An item is handed over once; a second approval rolls back
            let handed_over = sqlx::query(
                "UPDATE found_items SET status = ?, updated_at = ? WHERE id = ? AND status != ?",
            )
            .bind(item_status)
            .bind(&now)
            .bind(&item_id)
            .bind(FoundItemStatus::Claimed)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

            if handed_over.rows_affected() == 0 {
                warn!(claim_id = %claim_id, item_id = %item_id, "Item already handed over");
                return Err(WorkflowError::ItemAlreadyClaimed.into());
            }
        }

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(
            claim_id = %claim_id,
            item_id = %item_id,
            status = %outcome.claim,
            reviewer = %safe_email_log(reviewer_email),
            "Claim adjudicated"
        );

        self.get(claim_id).await
    }

    pub async fn get(&self, claim_id: &str) -> Result<Claim, ApiError> {
        sqlx::query_as::<_, Claim>("SELECT * FROM claims WHERE id = ?")
            .bind(claim_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("Claim not found: {}", claim_id)))
    }

    pub async fn get_detail(&self, claim_id: &str) -> Result<ClaimDetail, ApiError> {
        let sql = format!("{} WHERE c.id = ?", DETAIL_SELECT);
        sqlx::query_as::<_, ClaimDetail>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("Claim not found: {}", claim_id)))
    }

    /// Claims with their item summary, newest first
    pub async fn list(&self, status: Option<ClaimStatus>) -> Result<Vec<ClaimDetail>, ApiError> {
        let claims = match status {
            Some(status) => {
                let sql = format!(
                    "{} WHERE c.status = ? ORDER BY c.created_at DESC, c.rowid DESC",
                    DETAIL_SELECT
                );
                sqlx::query_as::<_, ClaimDetail>(&sql)
                    .bind(status)
                    .fetch_all(&self.db)
                    .await
            }
            None => {
                let sql = format!("{} ORDER BY c.created_at DESC, c.rowid DESC", DETAIL_SELECT);
                sqlx::query_as::<_, ClaimDetail>(&sql).fetch_all(&self.db).await
            }
        }
        .map_err(ApiError::DatabaseError)?;

        Ok(claims)
    }
}
