// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::policy::AuthorizationPolicy;
use crate::common::dev_mode::DevModeConfig;
use crate::services::storage::{LocalStore, ObjectStore};
use crate::services::GoogleService;

/// Application state containing database pool, adapters, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub google_redirect_uri: String,
    pub google: Arc<GoogleService>,
    pub storage: Arc<dyn ObjectStore>,
    /// Set when uploads live on local disk and are served by this process
    pub local_uploads: Option<LocalStore>,
    pub policy: Arc<dyn AuthorizationPolicy>,
    pub dev_mode: DevModeConfig,
}
