// src/services/google.rs
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("Google OAuth not configured")]
    NotConfigured,

    #[error("Token rejected: {0}")]
    TokenRejected(String),

    #[error("Token missing required claims")]
    MissingClaims,

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub id_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
    pub scope: Option<String>,
}

/// Identity asserted by a verified Google ID token
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleIdentity {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug)]
pub struct GoogleService {
    client: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl GoogleService {
    pub fn new(client: Client, client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            client,
            client_id,
            client_secret,
        }
    }

    /// Build the consent page URL for the sign-in redirect
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, GoogleError> {
        let client_id = self.client_id.as_ref().ok_or(GoogleError::NotConfigured)?;

        Ok(format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&prompt=select_account",
            AUTHORIZE_ENDPOINT,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state)
        ))
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, GoogleError> {
        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(GoogleError::NotConfigured),
        };

        let params = [
            ("code", code),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(GoogleError::OAuthFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))
    }

    /// Verify an ID token with Google's tokeninfo endpoint
    /// Docs: https://developers.google.com/identity/sign-in/web/backend-auth
    pub async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdentity, GoogleError> {
        // Without a client id the audience cannot be checked, so nothing is accepted
        let client_id = self.client_id.as_deref().ok_or(GoogleError::NotConfigured)?;

        let response = self
            .client
            .get(TOKENINFO_ENDPOINT)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, endpoint = TOKENINFO_ENDPOINT, "HTTP error contacting Google tokeninfo endpoint");
                GoogleError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        debug!(http_status = %status, "Received response from Google tokeninfo endpoint");

        if !status.is_success() {
            warn!(http_status = %status, "Google tokeninfo rejected the token");
            return Err(GoogleError::TokenRejected(
                "invalid or expired id_token".to_string(),
            ));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))?;

        identity_from_tokeninfo(&body, client_id, chrono::Utc::now().timestamp())
    }
}

/// Checks a tokeninfo payload and extracts the identity.
/// tokeninfo encodes numbers and booleans as strings, so both forms are accepted.
/// Only verified addresses are returned.
pub fn identity_from_tokeninfo(
    body: &Value,
    expected_audience: &str,
    now: i64,
) -> Result<GoogleIdentity, GoogleError> {
    let email = body.get("email").and_then(Value::as_str);
    let subject = body.get("sub").and_then(Value::as_str);

    let (email, subject) = match (email, subject) {
        (Some(e), Some(s)) if !e.is_empty() && !s.is_empty() => (e, s),
        _ => {
            warn!("Google token missing required fields (email/sub)");
            return Err(GoogleError::MissingClaims);
        }
    };

    if let Some(exp) = body.get("exp").and_then(value_as_i64) {
        if exp < now {
            warn!(token_exp = exp, current_time = now, "Google token has expired");
            return Err(GoogleError::TokenRejected("token has expired".to_string()));
        }
    }

    match body.get("aud").and_then(Value::as_str) {
        Some(aud) if aud == expected_audience => {}
        Some(aud) => {
            warn!(token_audience = %aud, "Google token audience validation failed");
            return Err(GoogleError::TokenRejected(
                "token audience mismatch".to_string(),
            ));
        }
        None => {
            return Err(GoogleError::TokenRejected(
                "token missing audience".to_string(),
            ));
        }
    }

    let email_verified = body
        .get("email_verified")
        .map(|v| match v {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true",
            _ => false,
        })
        .unwrap_or(false);

    if !email_verified {
        warn!("Google token carries an unverified email address");
        return Err(GoogleError::TokenRejected(
            "email address is not verified".to_string(),
        ));
    }

    Ok(GoogleIdentity {
        subject: subject.to_string(),
        email: email.to_string(),
        name: body.get("name").and_then(Value::as_str).map(str::to_string),
        email_verified,
    })
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
