// src/services/storage/local.rs
//! Filesystem-backed object store used when S3 is not configured

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::{validate_key, ObjectStore, StorageError};

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/api/uploads/{}", self.public_base_url, key)
    }

    /// Reads a stored object back (used to serve local uploads)
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        validate_key(key)?;
        match tokio::fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        validate_key(key)?;
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, &data).await.map_err(|e| {
            error!(error = %e, path = %path.display(), "Failed to write upload to disk");
            StorageError::UploadFailed(e.to_string())
        })?;

        info!(key = %key, size = data.len(), "File stored locally");
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => {
                debug!(key = %key, "Local file deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(e.to_string())),
        }
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

/// Content type served for a stored key, derived from its extension
pub fn content_type_for(key: &str) -> &'static str {
    let ext = Path::new(key)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
