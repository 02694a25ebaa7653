// src/services/storage/mod.rs
//! Object storage adapter
//!
//! Uploaded media (item photos, claimant photos, receipts, proofs) is written
//! through the [`ObjectStore`] trait, which returns a publicly resolvable URL
//! for every stored object. Two backends exist: S3 and a local directory.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

pub use local::LocalStore;
pub use s3::S3Store;

use crate::common::config::StorageConfig;
use crate::common::uploads::{object_key, UploadedFile};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under `key` and returns its public URL
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, StorageError>;

    /// Removes the object stored under `key`
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// Rejects keys that could escape the storage namespace
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment.is_empty() || segment == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Builds the configured backend
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config {
        StorageConfig::Local {
            dir,
            public_base_url,
        } => {
            tokio::fs::create_dir_all(dir).await?;
            Ok(Arc::new(LocalStore::new(dir.clone(), public_base_url)))
        }
        StorageConfig::S3 {
            access_key_id,
            secret_access_key,
            region,
            bucket,
            cloudfront_domain,
        } => Ok(Arc::new(
            S3Store::new(
                access_key_id,
                secret_access_key,
                region,
                bucket,
                cloudfront_domain.clone(),
            )
            .await,
        )),
    }
}

/// Deletes objects written by a request that later failed.
/// Failures are logged and otherwise ignored; the original error wins.
pub async fn remove_uploaded(store: &dyn ObjectStore, keys: &[String]) {
    for key in keys {
        if let Err(e) = store.delete(key).await {
            warn!(error = %e, key = %key, backend = store.backend(), "Failed to remove orphaned upload");
        }
    }
}

/// Tracks the objects written for one request so they can be removed
/// if a later step of the request fails
pub struct UploadSession<'a> {
    store: &'a dyn ObjectStore,
    keys: Vec<String>,
}

impl<'a> UploadSession<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            keys: Vec::new(),
        }
    }

    /// Uploads `file` below `prefix` and returns its public URL
    pub async fn upload(&mut self, prefix: &str, file: &UploadedFile) -> Result<String, StorageError> {
        let key = object_key(prefix, file);
        let url = self
            .store
            .put(&key, file.data.clone(), &file.mime_type())
            .await?;
        self.keys.push(key);
        Ok(url)
    }

    pub async fn upload_all(
        &mut self,
        prefix: &str,
        files: &[UploadedFile],
    ) -> Result<Vec<String>, StorageError> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            urls.push(self.upload(prefix, file).await?);
        }
        Ok(urls)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Deletes everything uploaded so far
    pub async fn rollback(self) {
        if self.keys.is_empty() {
            return;
        }
        warn!(count = self.keys.len(), backend = self.store.backend(), "Rolling back uploads");
        remove_uploaded(self.store, &self.keys).await;
    }
}
