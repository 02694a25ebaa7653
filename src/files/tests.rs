//! Tests for files module

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::generate_raw_id;
    use crate::common::test_support::{png_bytes, setup_test_db, test_state, MemoryStore};
    use crate::common::{ApiError, AppState};
    use crate::services::storage::{LocalStore, ObjectStore};
    use axum::extract::{Extension, Path};
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn shared(state: AppState) -> Extension<Arc<RwLock<AppState>>> {
        Extension(Arc::new(RwLock::new(state)))
    }

    #[tokio::test]
    async fn test_serves_local_upload_with_content_type() {
        let root = std::env::temp_dir().join(format!("lost-found-files-{}", generate_raw_id(10)));
        let store = LocalStore::new(root.clone(), "http://localhost:8080");
        store
            .put("found-items/1-abc.png", png_bytes(), "image/png")
            .await
            .unwrap();

        let mut state = test_state(setup_test_db().await, Arc::new(store.clone()));
        state.local_uploads = Some(store);

        let response = handlers::serve_upload(shared(state), Path("found-items/1-abc.png".to_string()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn test_missing_or_remote_uploads_are_not_found() {
        let state = test_state(setup_test_db().await, Arc::new(MemoryStore::new()));
        let result = handlers::serve_upload(shared(state), Path("found-items/x.png".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let root = std::env::temp_dir().join(format!("lost-found-files-{}", generate_raw_id(10)));
        let store = LocalStore::new(root, "http://localhost:8080");
        let mut state = test_state(setup_test_db().await, Arc::new(store.clone()));
        state.local_uploads = Some(store);

        let result = handlers::serve_upload(shared(state), Path("../secrets.png".to_string())).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
