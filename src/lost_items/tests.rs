//! Tests for lost items module

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::helpers::parse_url_list;
    use crate::common::test_support::{png_file, setup_test_db, test_state, text_file, MemoryStore};
    use crate::common::{ApiError, Validator};
    use models::{LostItemReport, LostItemStatus};
    use services::LostItemService;
    use std::sync::Arc;

    fn report(name: &str, pictures: usize) -> LostItemReport {
        LostItemReport {
            item_name: name.to_string(),
            item_type: "Smart watch".to_string(),
            description: "Black strap, cracked bezel".to_string(),
            location: "Science block".to_string(),
            date_lost: "2024-02-11".to_string(),
            reporter_name: "Owner".to_string(),
            reporter_phone: "+44 20 7946 0000".to_string(),
            pictures: (0..pictures).map(|i| png_file(&format!("watch-{}.png", i))).collect(),
            proof: None,
        }
    }

    #[test]
    fn test_validation_picture_bounds() {
        let validator = validators::LostItemReportValidator;

        assert!(validator.validate(&report("Watch", 1)).is_valid);
        assert!(validator.validate(&report("Watch", 3)).is_valid);
        assert!(validator.validate(&report("Watch", 0)).has_error("pictures"));
        assert!(validator.validate(&report("Watch", 4)).has_error("pictures"));

        let mut bad_proof = report("Watch", 1);
        bad_proof.proof = Some(text_file("receipt.txt"));
        assert!(validator.validate(&bad_proof).has_error("proof"));
    }

    #[tokio::test]
    async fn test_report_stores_pictures_and_proof() {
        let db = setup_test_db().await;
        let store = Arc::new(MemoryStore::new());
        let state = test_state(db, store.clone());

        let mut with_proof = report("Watch", 2);
        with_proof.proof = Some(png_file("receipt.png"));

        let item = handlers::file_report(&state, "owner@campus.edu", with_proof)
            .await
            .unwrap();

        assert!(item.id.starts_with("LI_"));
        assert_eq!(item.status, LostItemStatus::Reported);
        assert_eq!(item.reporter_email, "owner@campus.edu");
        assert_eq!(parse_url_list(&item.picture_urls).len(), 2);
        assert!(item
            .proof_url
            .as_deref()
            .unwrap()
            .contains("lost-items/proofs/"));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["picture_urls"].as_array().unwrap().len(), 2);
        assert_eq!(json["item_type"], "Smart watch");
        assert_eq!(store.keys().len(), 3);
    }

    #[tokio::test]
    async fn test_proof_upload_failure_rolls_back_pictures() {
        let db = setup_test_db().await;
        let store = Arc::new(MemoryStore::failing_on_put(3));
        let state = test_state(db.clone(), store.clone());

        let mut with_proof = report("Watch", 2);
        with_proof.proof = Some(png_file("receipt.png"));

        let result = handlers::file_report(&state, "owner@campus.edu", with_proof).await;
        assert!(matches!(result, Err(ApiError::UploadError(_))));
        assert!(store.keys().is_empty());
        assert_eq!(store.deleted().len(), 2);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lost_items")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_admin_listing_and_status_update() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));

        let watch = handlers::file_report(&state, "owner@campus.edu", report("Silver watch", 1))
            .await
            .unwrap();
        let _scarf = handlers::file_report(&state, "other@campus.edu", report("Red scarf", 1))
            .await
            .unwrap();

        let service = LostItemService::new(db);
        let found = service
            .update_status(&watch.id, LostItemStatus::Found)
            .await
            .unwrap();
        assert_eq!(found.status, LostItemStatus::Found);

        let only_found = service
            .list_admin(Some(LostItemStatus::Found), None)
            .await
            .unwrap();
        assert_eq!(only_found.len(), 1);
        assert_eq!(only_found[0].id, watch.id);

        let by_name = service.list_admin(None, Some("SCARF")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].item_name, "Red scarf");

        let all = service.list_admin(None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].item_name, "Red scarf", "newest first");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "not_found".parse::<LostItemStatus>().unwrap(),
            LostItemStatus::NotFound
        );
        assert!("claim submitted".parse::<LostItemStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&LostItemStatus::NotFound).unwrap(),
            "\"not_found\""
        );
    }
}
