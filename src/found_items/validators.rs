use super::models::FoundItemReport;
use crate::common::uploads::check_image;
use crate::common::validation::{check_email, check_past_date, check_phone};
use crate::common::{ItemType, ValidationResult, Validator};

pub struct FoundItemReportValidator;

impl Validator<FoundItemReport> for FoundItemReportValidator {
    fn validate(&self, data: &FoundItemReport) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Err(message) = data.item_type.parse::<ItemType>() {
            result.add_error("item_type", &message);
        }

        result.require_text("description", &data.description, "Description is required");
        if data.description.len() > 2000 {
            result.add_error("description", "Description must not exceed 2000 characters");
        }
        result.require_text("location", &data.location, "Location is required");
        check_past_date(&mut result, "date_found", &data.date_found);
        result.require_text("reporter_name", &data.reporter_name, "Your name is required");
        check_email(&mut result, "reporter_email", &data.reporter_email);
        check_phone(&mut result, "reporter_phone", &data.reporter_phone);

        match &data.picture {
            Some(file) => check_image(&mut result, "picture", file),
            None => result.add_error("picture", "A picture of the item is required"),
        }

        result
    }
}
