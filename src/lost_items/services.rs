use sqlx::SqlitePool;
use tracing::info;

use super::models::{LostItem, LostItemReport, LostItemStatus};
use crate::common::{generate_lost_item_id, ApiError, ItemType, SqlFilter};

pub struct LostItemService {
    db: SqlitePool,
}

impl LostItemService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        report: &LostItemReport,
        item_type: ItemType,
        picture_urls: &[String],
        proof_url: Option<&str>,
        reporter_email: &str,
    ) -> Result<LostItem, ApiError> {
        let id = generate_lost_item_id();
        let now = chrono::Utc::now().to_rfc3339();
        let pictures_json = serde_json::to_string(picture_urls)
            .map_err(|e| ApiError::InternalServer(format!("Failed to encode picture list: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO lost_items (
                id, item_name, item_type, description, location, date_lost, picture_urls,
                proof_url, reporter_name, reporter_email, reporter_phone, status,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(report.item_name.trim())
        .bind(item_type)
        .bind(report.description.trim())
        .bind(report.location.trim())
        .bind(report.date_lost.trim())
        .bind(&pictures_json)
        .bind(proof_url)
        .bind(report.reporter_name.trim())
        .bind(reporter_email)
        .bind(report.reporter_phone.trim())
        .bind(LostItemStatus::Reported)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(item_id = %id, item_type = %item_type, pictures = picture_urls.len(), "Lost item reported");

        self.get(&id).await
    }

    pub async fn get(&self, item_id: &str) -> Result<LostItem, ApiError> {
        sqlx::query_as::<_, LostItem>("SELECT * FROM lost_items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("Lost item not found: {}", item_id)))
    }

    /// Admin table: optional status filter, search over description, location,
    /// reporter name and item name, newest first
    pub async fn list_admin(
        &self,
        status: Option<LostItemStatus>,
        search: Option<&str>,
    ) -> Result<Vec<LostItem>, ApiError> {
        let mut filter = SqlFilter::new();
        if let Some(status) = status {
            filter.push("status = ?", status.as_str());
        }
        if let Some(term) = search {
            filter.push_search(&["description", "location", "reporter_name", "item_name"], term);
        }

        let sql = format!(
            "SELECT * FROM lost_items{} ORDER BY created_at DESC, rowid DESC",
            filter.where_sql()
        );
        let mut query = sqlx::query_as::<_, LostItem>(&sql);
        for param in filter.params() {
            query = query.bind(param.as_str());
        }
        query.fetch_all(&self.db).await.map_err(ApiError::DatabaseError)
    }

    /// Unconstrained status correction by an administrator
    pub async fn update_status(
        &self,
        item_id: &str,
        status: LostItemStatus,
    ) -> Result<LostItem, ApiError> {
        let result = sqlx::query("UPDATE lost_items SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(item_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Lost item not found: {}", item_id)));
        }

        info!(item_id = %item_id, status = %status, "Lost item status updated");
        self.get(item_id).await
    }
}
