use super::evidence::ClaimEvidence;
use super::models::{ClaimSubmission, MAX_ITEM_IMAGES};
use crate::common::uploads::check_images;
use crate::common::{ItemType, ValidationResult, Validator};

/// Validates a claim form against the type of the item being claimed
pub struct ClaimSubmissionValidator {
    pub item_type: ItemType,
}

impl Validator<ClaimSubmission> for ClaimSubmissionValidator {
    fn validate(&self, data: &ClaimSubmission) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require_text(
            "details",
            &data.details,
            "Please describe why this item is yours",
        );
        if data.details.len() > 5000 {
            result.add_error("details", "Details must not exceed 5000 characters");
        }

        check_images(&mut result, "item_images", &data.item_images, 1, MAX_ITEM_IMAGES);

        if data.claimant_images.len() != 1 {
            result.add_error("claimant_image", "Exactly one picture of yourself is required");
        } else {
            check_images(&mut result, "claimant_image", &data.claimant_images, 1, 1);
        }

        if data.purchase_receipts.len() != 1 {
            result.add_error("purchase_receipt", "Exactly one purchase receipt is required");
        } else {
            check_images(&mut result, "purchase_receipt", &data.purchase_receipts, 1, 1);
        }

        if let Err(evidence_errors) = ClaimEvidence::parse(self.item_type, &data.extra_info) {
            result.merge(evidence_errors);
        }

        result
    }
}
