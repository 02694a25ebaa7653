// Shared fixtures for module tests

use async_trait::async_trait;
use reqwest::Client;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::dev_mode::DevModeConfig;
use super::{AppState, UploadedFile};
use crate::auth::models::{Role, User};
use crate::auth::services::UserService;
use crate::auth::AdminAllowList;
use crate::services::google::{GoogleIdentity, GoogleService};
use crate::services::storage::{ObjectStore, StorageError};

pub const ADMIN_EMAIL: &str = "admin@campus.edu";

/// In-memory SQLite with the production schema.
/// A single connection keeps every query on the same database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    super::migrations::run_migrations(&pool)
        .await
        .expect("migrations");
    pool
}

/// Object store that keeps bytes in memory and can fail on demand
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
    puts: AtomicUsize,
    fail_on_put: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `n`th put (1-based) returns an upload error
    pub fn failing_on_put(n: usize) -> Self {
        Self {
            fail_on_put: Some(n),
            ..Self::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let attempt = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_put == Some(attempt) {
            return Err(StorageError::UploadFailed(format!("injected failure on put {}", attempt)));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(format!("https://files.test/{}", key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(key);
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

pub fn test_state(db: SqlitePool, storage: Arc<dyn ObjectStore>) -> AppState {
    AppState {
        db,
        jwt_secret: "test_secret_key".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        google_redirect_uri: "http://localhost:8080/auth/google/callback".to_string(),
        google: Arc::new(GoogleService::new(Client::new(), None, None)),
        storage,
        local_uploads: None,
        policy: Arc::new(AdminAllowList::new([ADMIN_EMAIL])),
        dev_mode: DevModeConfig::disabled(),
    }
}

pub async fn insert_user(db: &SqlitePool, email: &str, role: Role) -> User {
    let identity = GoogleIdentity {
        subject: format!("sub-{}", email),
        email: email.to_string(),
        name: Some("Test User".to_string()),
        email_verified: true,
    };
    UserService::new(db.clone())
        .upsert_from_identity(&identity, role)
        .await
        .expect("insert user")
}

pub fn png_bytes() -> Vec<u8> {
    vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D]
}

pub fn png_file(name: &str) -> UploadedFile {
    UploadedFile::new(name, "image/png", png_bytes())
}

pub fn text_file(name: &str) -> UploadedFile {
    UploadedFile::new(name, "text/plain", b"definitely not an image".to_vec())
}
