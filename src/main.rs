// src/main.rs
use axum::{extract::DefaultBodyLimit, extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod admin;
mod auth;
mod claims;
mod common;
mod files;
mod found_items;
mod logging_middleware;
mod lost_items;
mod services;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::AdminAllowList;
use common::config::StorageConfig;
use common::dev_mode::DevModeConfig;
use common::{AppConfig, AppState};
use services::storage::{self, LocalStore};
use services::GoogleService;

/// Multipart claims carry up to five images of 10 MiB each
const MAX_REQUEST_BODY: usize = 60 * 1024 * 1024;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();
    info!(
        admin_count = config.admin_emails.len(),
        google_configured = config.google_client_id.is_some(),
        "Configuration loaded"
    );

    // ========================================================================
    // DEV MODE CONFIGURATION
    // ========================================================================

    let dev_mode = DevModeConfig::from_env().with_args(std::env::args());
    dev_mode.log_status();

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    // Run database migrations
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().build()?;

    let google_service = Arc::new(GoogleService::new(
        http_client,
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    ));
    info!("GoogleService initialized");

    let object_store = storage::from_config(&config.storage).await?;
    let local_uploads = match &config.storage {
        StorageConfig::Local {
            dir,
            public_base_url,
        } => Some(LocalStore::new(dir.clone(), public_base_url)),
        StorageConfig::S3 { .. } => None,
    };
    info!(backend = object_store.backend(), "Object storage initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        jwt_secret: config.jwt_secret.clone(),
        frontend_url: config.frontend_url.clone(),
        google_redirect_uri: config.google_redirect_uri.clone(),
        google: google_service,
        storage: object_store,
        local_uploads,
        policy: Arc::new(AdminAllowList::new(&config.admin_emails)),
        dev_mode,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let origins: Vec<axum::http::HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = Router::new()
        .merge(auth::auth_routes())
        .merge(found_items::found_items_routes())
        .merge(lost_items::lost_items_routes())
        .merge(claims::claims_routes())
        .merge(admin::admin_routes())
        .merge(files::files_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .layer(Extension(shared.clone()))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
