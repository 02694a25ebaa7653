//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Role stored on the user row, recomputed at every sign-in
#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub email_verified: bool,
    pub provider: Option<String>,
    pub provider_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Google ID token payload for OAuth
#[derive(Deserialize)]
pub struct GoogleIdTokenPayload {
    pub id_token: String,
}

/// Query string Google appends when redirecting back to the callback
#[derive(Deserialize, Debug, Default)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
