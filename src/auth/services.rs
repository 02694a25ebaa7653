use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{Role, User};
use crate::common::{generate_user_id, safe_email_log, ApiError};
use crate::services::google::GoogleIdentity;

pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts or refreshes the user keyed by email.
    /// The role is overwritten on every sign-in so allow-list edits take effect.
    pub async fn upsert_from_identity(
        &self,
        identity: &GoogleIdentity,
        role: Role,
    ) -> Result<User, ApiError> {
        let email = identity.email.trim().to_lowercase();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, role, email_verified, provider, provider_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 'google', ?, ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                full_name = COALESCE(excluded.full_name, users.full_name),
                role = excluded.role,
                email_verified = excluded.email_verified,
                provider = excluded.provider,
                provider_id = excluded.provider_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(generate_user_id())
        .bind(&email)
        .bind(identity.name.as_deref())
        .bind(role)
        .bind(identity.email_verified)
        .bind(&identity.subject)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let user = self
            .get_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::InternalServer("user upsert failed".to_string()))?;

        info!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            role = user.role.as_str(),
            "User synchronized from Google identity"
        );

        Ok(user)
    }

    pub async fn get_by_id(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    /// All users, newest first
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }
}
