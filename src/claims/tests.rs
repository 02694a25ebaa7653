//! Tests for claims module
//!
//! These tests verify:
//! - Claim submission moves the item to `claim submitted`
//! - Approval hands the item over, rejection leaves it alone
//! - Decided claims and handed-over items refuse further changes
//! - Failed uploads or inserts leave neither stored files nor rows behind

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::helpers::parse_url_list;
    use crate::common::test_support::{
        png_file, setup_test_db, test_state, text_file, MemoryStore, ADMIN_EMAIL,
    };
    use crate::common::{ApiError, AppState, ItemType};
    use crate::found_items::models::FoundItemReport;
    use crate::found_items::services::FoundItemService;
    use crate::found_items::{FoundItem, FoundItemStatus};
    use models::ClaimSubmission;
    use serde_json::{json, Value};
    use services::ClaimService;
    use sqlx::SqlitePool;
    use std::sync::Arc;
    use workflow::ClaimDecision;

    const CLAIMANT: &str = "owner@campus.edu";

    async fn found_item(state: &AppState, item_type: &str) -> FoundItem {
        let report = FoundItemReport {
            item_type: item_type.to_string(),
            description: "Black phone in a blue case".to_string(),
            location: "Main Library".to_string(),
            date_found: "2024-03-01".to_string(),
            submitted_to_office: false,
            reporter_name: "Finder".to_string(),
            reporter_email: "finder@campus.edu".to_string(),
            reporter_phone: "555-010-2030".to_string(),
            picture: Some(png_file("found.png")),
        };
        crate::found_items::handlers::file_report(state, "finder@campus.edu", report)
            .await
            .unwrap()
    }

    fn phone_answers() -> Value {
        json!({
            "imei": "356938035643809",
            "simName": "Campus Mobile",
            "simNumber": "0700000000",
            "frequentNumber1": "0711111111",
            "frequentNumber2": "0722222222",
            "model": "Pixel 7",
            "lastLocation": "Library",
            "nickname": "should be dropped"
        })
    }

    fn submission(item_images: usize) -> ClaimSubmission {
        ClaimSubmission {
            details: "It has my initials scratched on the back".to_string(),
            extra_info: phone_answers().to_string(),
            item_images: (0..item_images)
                .map(|i| png_file(&format!("item-{}.png", i)))
                .collect(),
            claimant_images: vec![png_file("me.png")],
            purchase_receipts: vec![png_file("receipt.png")],
        }
    }

    async fn item_status(db: &SqlitePool, item_id: &str) -> FoundItemStatus {
        FoundItemService::new(db.clone())
            .get(item_id)
            .await
            .unwrap()
            .status
    }

    async fn claim_count(db: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM claims")
            .fetch_one(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_claim_marks_item_claim_submitted() {
        let db = setup_test_db().await;
        let store = Arc::new(MemoryStore::new());
        let state = test_state(db.clone(), store.clone());
        let item = found_item(&state, "Phone").await;

        let claim = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(2))
            .await
            .unwrap();

        assert!(claim.id.starts_with("CL_"));
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.item_type, ItemType::Phone);
        assert_eq!(claim.claimant_email, CLAIMANT);
        assert_eq!(parse_url_list(&claim.item_images).len(), 2);
        assert!(claim.claimant_image.contains("claims/claimants/"));
        assert!(claim.purchase_receipt.contains("claims/purchase-receipt/"));
        assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::ClaimSubmitted);

        // found picture + 2 item images + claimant + receipt
        assert_eq!(store.keys().len(), 5);
    }

    #[tokio::test]
    async fn test_evidence_is_stored_without_extra_keys() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Phone").await;

        let claim = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1))
            .await
            .unwrap();

        let stored: Value = serde_json::from_str(&claim.extra_info).unwrap();
        assert_eq!(stored["imei"], "356938035643809");
        assert!(stored.get("nickname").is_none());

        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["extra_info"]["model"], "Pixel 7");
        assert_eq!(json["item_images"].as_array().unwrap().len(), 1);
        assert_eq!(json["status"], "pending");
    }

    #[tokio::test]
    async fn test_approval_hands_item_over() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Phone").await;
        let claim = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1))
            .await
            .unwrap();

        let approved = ClaimService::new(db.clone())
            .adjudicate(&claim.id, ClaimDecision::Approve, ADMIN_EMAIL)
            .await
            .unwrap();

        assert_eq!(approved.status, ClaimStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some(ADMIN_EMAIL));
        assert!(approved.reviewed_at.is_some());
        assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::Claimed);
    }

    #[tokio::test]
    async fn test_rejection_leaves_item_status_alone() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Phone").await;
        let claim = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1))
            .await
            .unwrap();

        let rejected = ClaimService::new(db.clone())
            .adjudicate(&claim.id, ClaimDecision::Reject, ADMIN_EMAIL)
            .await
            .unwrap();

        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::ClaimSubmitted);
    }

    #[tokio::test]
    async fn test_decided_claim_cannot_be_decided_again() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Phone").await;
        let claim = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1))
            .await
            .unwrap();

        let service = ClaimService::new(db.clone());
        service
            .adjudicate(&claim.id, ClaimDecision::Reject, ADMIN_EMAIL)
            .await
            .unwrap();

        let again = service
            .adjudicate(&claim.id, ClaimDecision::Approve, ADMIN_EMAIL)
            .await;
        assert!(matches!(again, Err(ApiError::Conflict(_))));

        let stored = service.get(&claim.id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::Rejected);
        assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::ClaimSubmitted);
    }

    #[tokio::test]
    async fn test_competing_claims_only_one_approved() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Phone").await;

        let first = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1))
            .await
            .unwrap();
        let second = handlers::submit_claim(&state, "rival@campus.edu", &item.id, submission(1))
            .await
            .unwrap();

        let service = ClaimService::new(db.clone());
        service
            .adjudicate(&first.id, ClaimDecision::Approve, ADMIN_EMAIL)
            .await
            .unwrap();

        let rival_approval = service
            .adjudicate(&second.id, ClaimDecision::Approve, ADMIN_EMAIL)
            .await;
        assert!(matches!(rival_approval, Err(ApiError::Conflict(_))));
        assert_eq!(
            service.get(&second.id).await.unwrap().status,
            ClaimStatus::Pending,
            "failed approval rolls back"
        );

        // The rival can still be rejected, and nobody can claim the item anymore
        service
            .adjudicate(&second.id, ClaimDecision::Reject, ADMIN_EMAIL)
            .await
            .unwrap();
        let late = handlers::submit_claim(&state, "late@campus.edu", &item.id, submission(1)).await;
        assert!(matches!(late, Err(ApiError::Conflict(_))));
        assert_eq!(claim_count(&db).await, 2);
    }

    #[tokio::test]
    async fn test_claim_on_missing_item_is_not_found() {
        let db = setup_test_db().await;
        let store = Arc::new(MemoryStore::new());
        let state = test_state(db.clone(), store.clone());

        let result = handlers::submit_claim(&state, CLAIMANT, "FI_MISSING", submission(1)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_missing_claim_is_not_found() {
        let db = setup_test_db().await;
        let service = ClaimService::new(db);

        let result = service
            .adjudicate("CL_MISSING", ClaimDecision::Approve, ADMIN_EMAIL)
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(matches!(
            service.get_detail("CL_MISSING").await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_submission_uploads_nothing() {
        let db = setup_test_db().await;
        let setup = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&setup, "Phone").await;

        let store = Arc::new(MemoryStore::new());
        let state = test_state(db.clone(), store.clone());

        let mut bad = submission(0);
        bad.claimant_images = vec![text_file("me.txt")];
        bad.purchase_receipts = vec![];
        bad.extra_info = json!({"imei": "123"}).to_string();

        match handlers::submit_claim(&state, CLAIMANT, &item.id, bad).await {
            Err(ApiError::ValidationError(message)) => {
                assert!(message.contains("item_images:"));
                assert!(message.contains("claimant_image:"));
                assert!(message.contains("purchase_receipt:"));
                assert!(message.contains("extra_info.model:"));
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(store.keys().is_empty());
        assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::Reported);
    }

    #[tokio::test]
    async fn test_upload_failure_at_each_stage_compensates() {
        let cases = [
            (2, "Failed to upload item images", 1),
            (3, "Failed to upload claimant picture", 2),
            (4, "Failed to upload purchase receipt", 3),
        ];

        for (failing_put, message, removed) in cases {
            let db = setup_test_db().await;
            let setup = test_state(db.clone(), Arc::new(MemoryStore::new()));
            let item = found_item(&setup, "Phone").await;

            let store = Arc::new(MemoryStore::failing_on_put(failing_put));
            let state = test_state(db.clone(), store.clone());

            match handlers::submit_claim(&state, CLAIMANT, &item.id, submission(2)).await {
                Err(ApiError::UploadError(msg)) => assert_eq!(msg, message),
                other => panic!("put {}: unexpected result {:?}", failing_put, other),
            }

            assert!(store.keys().is_empty(), "put {} left files", failing_put);
            assert_eq!(store.deleted().len(), removed, "put {}", failing_put);
            assert_eq!(claim_count(&db).await, 0);
            assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::Reported);
        }
    }

    #[tokio::test]
    async fn test_database_failure_removes_uploaded_files() {
        let db = setup_test_db().await;
        let setup = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&setup, "Phone").await;

        sqlx::query(
            "CREATE TRIGGER refuse_claims BEFORE INSERT ON claims \
             BEGIN SELECT RAISE(ABORT, 'claims table is read-only'); END",
        )
        .execute(&db)
        .await
        .unwrap();

        let store = Arc::new(MemoryStore::new());
        let state = test_state(db.clone(), store.clone());

        match handlers::submit_claim(&state, CLAIMANT, &item.id, submission(2)).await {
            Err(ApiError::DatabaseError(_)) => {}
            other => panic!("unexpected result {:?}", other),
        }

        // 2 item images + claimant + receipt were stored, then removed
        assert!(store.keys().is_empty());
        assert_eq!(store.deleted().len(), 4);
        assert_eq!(claim_count(&db).await, 0);
        assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::Reported);
    }

    #[tokio::test]
    async fn test_item_corrected_to_claimed_blocks_pending_approval() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Phone").await;
        let claim = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1))
            .await
            .unwrap();

        // Handed over at the desk and recorded directly by an admin
        FoundItemService::new(db.clone())
            .update_status(&item.id, FoundItemStatus::Claimed)
            .await
            .unwrap();

        let service = ClaimService::new(db.clone());
        let approval = service
            .adjudicate(&claim.id, ClaimDecision::Approve, ADMIN_EMAIL)
            .await;
        assert!(matches!(approval, Err(ApiError::Conflict(_))));
        assert_eq!(service.get(&claim.id).await.unwrap().status, ClaimStatus::Pending);

        let rejected = service
            .adjudicate(&claim.id, ClaimDecision::Reject, ADMIN_EMAIL)
            .await
            .unwrap();
        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert_eq!(item_status(&db, &item.id).await, FoundItemStatus::Claimed);
    }

    #[tokio::test]
    async fn test_admin_listing_includes_item_summary() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Phone").await;

        let first = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1))
            .await
            .unwrap();
        let second = handlers::submit_claim(&state, "other@campus.edu", &item.id, submission(1))
            .await
            .unwrap();

        let service = ClaimService::new(db.clone());
        service
            .adjudicate(&first.id, ClaimDecision::Reject, ADMIN_EMAIL)
            .await
            .unwrap();

        let all = service.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].claim.id, second.id, "newest first");
        assert_eq!(all[0].item_location.as_deref(), Some("Main Library"));
        assert_eq!(all[0].item_status, Some(FoundItemStatus::ClaimSubmitted));

        let pending = service.list(Some(ClaimStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].claim.id, second.id);

        let detail = service.get_detail(&first.id).await.unwrap();
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], first.id.as_str());
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["item_description"], "Black phone in a blue case");
    }

    #[tokio::test]
    async fn test_laptop_claim_requires_laptop_answers() {
        let db = setup_test_db().await;
        let state = test_state(db.clone(), Arc::new(MemoryStore::new()));
        let item = found_item(&state, "Laptop").await;

        // Phone answers do not satisfy the laptop questions
        let result = handlers::submit_claim(&state, CLAIMANT, &item.id, submission(1)).await;
        assert!(matches!(result, Err(ApiError::ValidationError(_))));

        let mut laptop = submission(1);
        laptop.extra_info = json!({
            "serialNumber": "PF3ABC12",
            "recentWebsite": "docs.rs",
            "signedUpEmail": CLAIMANT,
            "model": "ThinkPad X1",
            "installedApps": "VS Code",
            "lastLocation": "Lab 3"
        })
        .to_string();
        let claim = handlers::submit_claim(&state, CLAIMANT, &item.id, laptop)
            .await
            .unwrap();
        assert_eq!(claim.item_type, ItemType::Laptop);
    }
}
