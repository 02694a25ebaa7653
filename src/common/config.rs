// Application configuration loaded from the environment

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

/// Where uploaded media is persisted
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Files are written below `dir` and served from `/api/uploads/*key`
    Local {
        dir: PathBuf,
        public_base_url: String,
    },
    /// Files are written to an S3 bucket
    S3 {
        access_key_id: String,
        secret_access_key: String,
        region: String,
        bucket: String,
        cloudfront_domain: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_uri: String,
    pub frontend_url: String,
    pub admin_emails: HashSet<String>,
    pub cors_origins: Vec<String>,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://lost_found.db".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

        Self {
            database_url,
            port,
            jwt_secret,
            google_client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            google_client_secret: non_empty_var("GOOGLE_CLIENT_SECRET"),
            google_redirect_uri: env::var("GOOGLE_OAUTH_REDIRECT_URI")
                .unwrap_or_else(|_| format!("{}/auth/google/callback", public_base_url)),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_emails: parse_email_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            storage: storage_from_env(public_base_url),
        }
    }
}

fn storage_from_env(public_base_url: String) -> StorageConfig {
    let storage_type = env::var("STORAGE_TYPE").unwrap_or_else(|_| "local".to_string());

    if storage_type.starts_with("s3") {
        if let (Some(access_key_id), Some(secret_access_key), Some(bucket)) = (
            non_empty_var("AWS_ACCESS_KEY_ID"),
            non_empty_var("AWS_SECRET_ACCESS_KEY"),
            non_empty_var("AWS_S3_BUCKET_NAME"),
        ) {
            return StorageConfig::S3 {
                access_key_id,
                secret_access_key,
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                bucket,
                cloudfront_domain: non_empty_var("AWS_CLOUDFRONT_DOMAIN"),
            };
        }
        tracing::warn!("STORAGE_TYPE is s3 but AWS credentials are incomplete, using local storage");
    }

    StorageConfig::Local {
        dir: PathBuf::from(env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string())),
        public_base_url,
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a comma-separated list of emails into a lowercase set
pub fn parse_email_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
