//! Authentication handlers

use axum::{
    extract::{Extension, Json, Query},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::extractors::AuthedUser;
use super::models::{Claims, GoogleIdTokenPayload, OAuthCallbackQuery, User};
use super::services::UserService;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::google::GoogleIdentity;

const OAUTH_STATE_COOKIE: &str = "oauth_state";
const TOKEN_TTL_HOURS: i64 = 24;

/// POST /api/auth/google
/// Authenticates a user via Google OAuth ID token
///
/// # Request Body
/// ```json
/// {
///   "id_token": "<google id token>"
/// }
/// ```
///
/// # Response
/// ```json
/// {
///   "token": "<jwt token>",
///   "user": { ... },
///   "is_admin": false
/// }
/// ```
pub async fn google_auth(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<GoogleIdTokenPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("🔐 Received Google auth request");
    let state = state_lock.read().await.clone();

    if payload.id_token.trim().is_empty() {
        return Err(ApiError::BadRequest("id_token is required".to_string()));
    }

    let identity = state.google.verify_id_token(&payload.id_token).await?;

    let user = sync_user(&state, &identity).await?;
    let token = issue_jwt(&user.id, &state.jwt_secret)?;
    let is_admin = state.policy.is_admin(&user.email);

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user,
        "is_admin": is_admin,
    })))
}

/// GET /api/me
/// Returns the current authenticated user's information
///
/// # Response
/// ```json
/// {
///   "user": { ... },
///   "is_admin": true
/// }
/// ```
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    // In dev mode, return the dev user directly without database lookup
    if state.dev_mode.is_enabled() {
        let dev_user = state.dev_mode.create_dev_user();
        return Ok(Json(serde_json::json!({
            "user": dev_user,
            "is_admin": authed.is_admin
        })));
    }

    let user = UserService::new(state.db.clone())
        .get_by_id(&authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "user": user,
        "is_admin": authed.is_admin
    })))
}

/// POST /api/auth/logout
/// Tokens are stateless, so logout only acknowledges the request;
/// the client discards its token.
pub async fn logout_handler(authed: AuthedUser) -> Result<Json<serde_json::Value>, ApiError> {
    info!(user_id = %authed.id, "User logout successful");
    Ok(Json(serde_json::json!({
        "message": "Logout successful"
    })))
}

/// GET /auth/google - Start Google OAuth flow
/// Redirects the browser to Google's consent page
pub async fn google_oauth_start(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    let csrf_state = uuid::Uuid::new_v4().to_string();
    let auth_url = state
        .google
        .authorization_url(&state.google_redirect_uri, &csrf_state)?;

    info!(redirect_uri = %state.google_redirect_uri, "Starting Google OAuth flow");

    let cookie = format!(
        "{}={}; Path=/auth/google; HttpOnly; SameSite=Lax; Max-Age=600",
        OAUTH_STATE_COOKIE, csrf_state
    );
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&auth_url)).into_response())
}

/// GET /auth/google/callback - Handle OAuth callback from Google
///
/// Success redirects to `<FRONTEND_URL>/auth/callback#token=<jwt>`;
/// every failure redirects to `<FRONTEND_URL>/auth/error?reason=<code>`.
pub async fn google_oauth_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    headers: HeaderMap,
    Query(params): Query<OAuthCallbackQuery>,
) -> Redirect {
    let state = state_lock.read().await.clone();
    let frontend = state.frontend_url.trim_end_matches('/').to_string();

    match complete_oauth(&state, &headers, params).await {
        Ok(token) => Redirect::to(&format!("{}/auth/callback#token={}", frontend, token)),
        Err(reason) => {
            Redirect::to(&format!("{}/auth/error?reason={}", frontend, reason))
        }
    }
}

async fn complete_oauth(
    state: &AppState,
    headers: &HeaderMap,
    params: OAuthCallbackQuery,
) -> Result<String, &'static str> {
    if let Some(oauth_error) = params.error {
        warn!(oauth_error = %oauth_error, "Google OAuth returned error");
        return Err("access_denied");
    }

    let code = params.code.ok_or_else(|| {
        error!("No authorization code in OAuth callback");
        "missing_code"
    })?;

    let expected = cookie_value(headers, OAUTH_STATE_COOKIE);
    if expected.is_none() || expected.as_deref() != params.state.as_deref() {
        warn!("OAuth state mismatch on callback");
        return Err("invalid_state");
    }

    let tokens = state
        .google
        .exchange_code(&code, &state.google_redirect_uri)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to exchange authorization code for tokens");
            "exchange_failed"
        })?;

    let id_token = tokens.id_token.ok_or_else(|| {
        error!("Token response did not include an id_token");
        "missing_id_token"
    })?;

    let identity = state.google.verify_id_token(&id_token).await.map_err(|e| {
        warn!(error = %e, "ID token from code exchange failed verification");
        "invalid_token"
    })?;

    let user = sync_user(state, &identity).await.map_err(|e| {
        error!(error = %e, "Failed to persist user after OAuth callback");
        "server_error"
    })?;

    debug!(user_id = %user.id, "OAuth callback completed");
    issue_jwt(&user.id, &state.jwt_secret).map_err(|_| "server_error")
}

// ---- Helper Functions ----

/// Upserts the signed-in user with the role the policy assigns today.
/// Unverified addresses never get an account.
pub async fn sync_user(state: &AppState, identity: &GoogleIdentity) -> Result<User, ApiError> {
    if !identity.email_verified {
        warn!(email = %safe_email_log(&identity.email), "Refusing sign-in with unverified email address");
        return Err(ApiError::Unauthorized(
            "Email address is not verified".to_string(),
        ));
    }

    let role = state.policy.role_for(&identity.email);
    UserService::new(state.db.clone())
        .upsert_from_identity(identity, role)
        .await
}

/// Issues a 24h HS256 token for `user_id`
pub fn issue_jwt(user_id: &str, secret: &str) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, "JWT encoding error during authentication");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Validate a JWT token and return the claims
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        ApiError::Unauthorized("invalid token".to_string())
    })?;

    Ok(token_data.claims)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
