use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{
    AdminFoundItemFilter, FoundItem, FoundItemReport, FoundItemStatus, PUBLIC_PAGE_SIZE,
};
use crate::common::{generate_found_item_id, ApiError, ItemType, SqlFilter};

pub struct FoundItemService {
    db: SqlitePool,
}

impl FoundItemService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Persists a validated report; `found_by` is the signed-in reporter
    pub async fn create(
        &self,
        report: &FoundItemReport,
        item_type: ItemType,
        picture_url: &str,
        found_by: &str,
    ) -> Result<FoundItem, ApiError> {
        let id = generate_found_item_id();
        let now = chrono::Utc::now().to_rfc3339();
        let status = FoundItemStatus::initial(report.submitted_to_office);

        sqlx::query(
            r#"
            INSERT INTO found_items (
                id, item_type, description, location_found, date_found, picture_url,
                submitted_to_office, found_by, reporter_name, reporter_email, reporter_phone,
                status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(item_type)
        .bind(report.description.trim())
        .bind(report.location.trim())
        .bind(report.date_found.trim())
        .bind(picture_url)
        .bind(report.submitted_to_office)
        .bind(found_by)
        .bind(report.reporter_name.trim())
        .bind(report.reporter_email.trim())
        .bind(report.reporter_phone.trim())
        .bind(status)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(item_id = %id, item_type = %item_type, status = %status, "Found item reported");

        self.get(&id).await
    }

    pub async fn get(&self, item_id: &str) -> Result<FoundItem, ApiError> {
        sqlx::query_as::<_, FoundItem>("SELECT * FROM found_items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("Found item not found: {}", item_id)))
    }

    /// Public gallery: optional type filter, substring search over description
    /// and location, newest first, fixed page size
    pub async fn list_public(
        &self,
        item_type: Option<ItemType>,
        search: Option<&str>,
        page: i64,
    ) -> Result<(Vec<FoundItem>, i64), ApiError> {
        let page = page.max(1);
        let mut filter = SqlFilter::new();
        if let Some(item_type) = item_type {
            filter.push("item_type = ?", item_type.as_str());
        }
        if let Some(term) = search {
            filter.push_search(&["description", "location_found"], term);
        }

        let offset = (page - 1)
            .checked_mul(PUBLIC_PAGE_SIZE)
            .ok_or_else(|| ApiError::BadRequest(format!("page {} is out of range", page)))?;

        let total = self.count(&filter).await?;

        let sql = format!(
            "SELECT * FROM found_items{} ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
            filter.where_sql()
        );
        let mut query = sqlx::query_as::<_, FoundItem>(&sql);
        for param in filter.params() {
            query = query.bind(param.as_str());
        }
        let items = query
            .bind(PUBLIC_PAGE_SIZE)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        debug!(count = items.len(), total = total, page = page, "Listed found items");
        Ok((items, total))
    }

    /// Admin table: office-delivery filter, search over description,
    /// location and reporter name, newest first
    pub async fn list_admin(
        &self,
        status_filter: AdminFoundItemFilter,
        search: Option<&str>,
    ) -> Result<Vec<FoundItem>, ApiError> {
        let mut filter = SqlFilter::new();
        match status_filter {
            AdminFoundItemFilter::All => {}
            AdminFoundItemFilter::Submitted => filter.push_raw("submitted_to_office = 1"),
            AdminFoundItemFilter::NotSubmitted => filter.push_raw("submitted_to_office = 0"),
            AdminFoundItemFilter::Claimed => {
                filter.push("status = ?", FoundItemStatus::Claimed.as_str())
            }
        }
        if let Some(term) = search {
            filter.push_search(&["description", "location_found", "reporter_name"], term);
        }

        let sql = format!(
            "SELECT * FROM found_items{} ORDER BY created_at DESC, rowid DESC",
            filter.where_sql()
        );
        let mut query = sqlx::query_as::<_, FoundItem>(&sql);
        for param in filter.params() {
            query = query.bind(param.as_str());
        }
        query.fetch_all(&self.db).await.map_err(ApiError::DatabaseError)
    }

    /// Unconstrained status correction by an administrator
    pub async fn update_status(
        &self,
        item_id: &str,
        status: FoundItemStatus,
    ) -> Result<FoundItem, ApiError> {
        let result = sqlx::query("UPDATE found_items SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(item_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Found item not found: {}", item_id)));
        }

        info!(item_id = %item_id, status = %status, "Found item status updated");
        self.get(item_id).await
    }

    async fn count(&self, filter: &SqlFilter) -> Result<i64, ApiError> {
        let sql = format!("SELECT COUNT(*) FROM found_items{}", filter.where_sql());
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for param in filter.params() {
            query = query.bind(param.as_str());
        }
        query.fetch_one(&self.db).await.map_err(ApiError::DatabaseError)
    }
}
