//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::handlers::validate_jwt;
use super::services::UserService;
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the bearer JWT, loads the user row and asks the configured
/// authorization policy whether the user is an administrator.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

impl AuthedUser {
    /// Rejects non-admin callers with 403
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if !self.is_admin {
            warn!(
                user_id = %self.id,
                email = %safe_email_log(&self.email),
                "Admin route accessed by non-admin user"
            );
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // DEV MODE: Bypass authentication completely
        if app_state.dev_mode.is_enabled() {
            let dev_user = app_state.dev_mode.create_dev_user();
            let is_admin =
                app_state.dev_mode.user_is_admin || app_state.policy.is_admin(&dev_user.email);

            debug!(
                user_id = %dev_user.id,
                email = %safe_email_log(&dev_user.email),
                is_admin = is_admin,
                "DEV MODE: Authentication bypassed"
            );

            return Ok(AuthedUser {
                id: dev_user.id,
                email: dev_user.email,
                is_admin,
            });
        }

        let token = match parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            Some(t) => t.to_string(),
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        // Accept "Bearer <token>" or a raw token
        let bare_token = token.strip_prefix("Bearer ").unwrap_or(&token);
        let claims = validate_jwt(bare_token, &app_state.jwt_secret)?;

        let user = UserService::new(app_state.db.clone())
            .get_by_id(&claims.sub)
            .await?;

        match user {
            Some(u) => {
                let is_admin = u.email_verified && app_state.policy.is_admin(&u.email);
                debug!(
                    user_id = %u.id,
                    email = %safe_email_log(&u.email),
                    is_admin = is_admin,
                    "User authentication successful via extractor"
                );
                Ok(AuthedUser {
                    id: u.id,
                    email: u.email,
                    is_admin,
                })
            }
            None => {
                warn!(user_id = %claims.sub, "Authentication failed: user not found in database");
                Err(ApiError::Unauthorized("user not found".into()))
            }
        }
    }
}
