// src/files/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::common::{ApiError, AppState};
use crate::services::storage::local::content_type_for;

/// GET /api/uploads/*key - Stream a locally stored upload
pub async fn serve_upload(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let store = state
        .local_uploads
        .as_ref()
        .ok_or_else(|| ApiError::NotFound(format!("File not found: {}", key)))?;

    let bytes = store.read(&key).await?;
    debug!(key = %key, size = bytes.len(), "Serving local upload");

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&key)),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    ))
}
