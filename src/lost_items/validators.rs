use super::models::{LostItemReport, MAX_LOST_ITEM_PICTURES};
use crate::common::uploads::{check_image, check_images};
use crate::common::validation::{check_past_date, check_phone};
use crate::common::{ItemType, ValidationResult, Validator};

pub struct LostItemReportValidator;

impl Validator<LostItemReport> for LostItemReportValidator {
    fn validate(&self, data: &LostItemReport) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require_text("item_name", &data.item_name, "Item name is required");
        if data.item_name.len() > 200 {
            result.add_error("item_name", "Item name must not exceed 200 characters");
        }
        if let Err(message) = data.item_type.parse::<ItemType>() {
            result.add_error("item_type", &message);
        }
        result.require_text("description", &data.description, "Description is required");
        result.require_text("location", &data.location, "Location is required");
        check_past_date(&mut result, "date_lost", &data.date_lost);
        result.require_text("reporter_name", &data.reporter_name, "Your name is required");
        check_phone(&mut result, "reporter_phone", &data.reporter_phone);

        check_images(&mut result, "pictures", &data.pictures, 1, MAX_LOST_ITEM_PICTURES);
        if let Some(proof) = &data.proof {
            check_image(&mut result, "proof", proof);
        }

        result
    }
}
