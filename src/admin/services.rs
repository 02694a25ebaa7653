// src/admin/services.rs

use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::error;

use super::models::DashboardMetrics;
use crate::claims::ClaimStatus;
use crate::common::ApiError;
use crate::found_items::FoundItemStatus;
use crate::lost_items::LostItemStatus;

pub struct DashboardService {
    db: SqlitePool,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn metrics(&self) -> Result<DashboardMetrics, ApiError> {
        let found_items_by_status = self
            .status_breakdown(
                "found_items",
                &[
                    FoundItemStatus::Reported.as_str(),
                    FoundItemStatus::Submitted.as_str(),
                    FoundItemStatus::ClaimSubmitted.as_str(),
                    FoundItemStatus::Claimed.as_str(),
                ],
            )
            .await?;
        let lost_items_by_status = self
            .status_breakdown(
                "lost_items",
                &[
                    LostItemStatus::Reported.as_str(),
                    LostItemStatus::NotFound.as_str(),
                    LostItemStatus::Found.as_str(),
                    LostItemStatus::Claimed.as_str(),
                ],
            )
            .await?;
        let claims_by_status = self
            .status_breakdown(
                "claims",
                &[
                    ClaimStatus::Pending.as_str(),
                    ClaimStatus::Approved.as_str(),
                    ClaimStatus::Rejected.as_str(),
                ],
            )
            .await?;

        let found_items_at_office = self
            .count("SELECT COUNT(*) FROM found_items WHERE submitted_to_office = 1")
            .await?;
        let total_users = self.count("SELECT COUNT(*) FROM users").await?;
        let admin_users = self
            .count("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .await?;

        Ok(DashboardMetrics {
            total_found_items: found_items_by_status.values().sum(),
            found_items_at_office,
            total_lost_items: lost_items_by_status.values().sum(),
            total_claims: claims_by_status.values().sum(),
            pending_claims: claims_by_status
                .get(ClaimStatus::Pending.as_str())
                .copied()
                .unwrap_or(0),
            total_users,
            admin_users,
            last_updated: chrono::Utc::now().to_rfc3339(),
            found_items_by_status,
            lost_items_by_status,
            claims_by_status,
        })
    }

    /// Row counts per status, with zero for statuses no row currently has
    async fn status_breakdown(
        &self,
        table: &'static str,
        statuses: &[&str],
    ) -> Result<BTreeMap<String, i64>, ApiError> {
        let sql = format!("SELECT status, COUNT(*) FROM {} GROUP BY status", table);
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, table = table, "Database error counting rows by status");
                ApiError::DatabaseError(e)
            })?;

        let mut breakdown: BTreeMap<String, i64> =
            statuses.iter().map(|s| (s.to_string(), 0)).collect();
        breakdown.extend(rows);
        Ok(breakdown)
    }

    async fn count(&self, sql: &str) -> Result<i64, ApiError> {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching dashboard count");
                ApiError::DatabaseError(e)
            })
    }
}
