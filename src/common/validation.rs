// Common validation types and traits

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Accumulates every failing field so a form reports all problems at once
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Records an error when `value` is blank
    pub fn require_text(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add_error(field, message);
        }
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

/// Requires a `YYYY-MM-DD` date that is not in the future
pub fn check_past_date(result: &mut ValidationResult, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        result.add_error(field, "Date is required");
        return;
    }
    match chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) if date > chrono::Utc::now().date_naive() => {
            result.add_error(field, "Date cannot be in the future");
        }
        Ok(_) => {}
        Err(_) => result.add_error(field, "Date must use the YYYY-MM-DD format"),
    }
}

/// Requires a phone number of 7 to 20 digits, allowing `+`, spaces, dashes and parentheses
pub fn check_phone(result: &mut ValidationResult, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        result.add_error(field, "Phone number is required");
        return;
    }
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !allowed || !(7..=20).contains(&digits) {
        result.add_error(field, "Phone number is invalid");
    }
}

/// Requires a plausible email address
pub fn check_email(result: &mut ValidationResult, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        result.add_error(field, "Email is required");
        return;
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        result.add_error(field, "Email address is invalid");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_whitespace() {
        let mut result = ValidationResult::new();
        result.require_text("details", "   ", "Details are required");
        assert!(!result.is_valid);
        assert!(result.has_error("details"));
    }

    #[test]
    fn test_check_past_date() {
        let mut result = ValidationResult::new();
        check_past_date(&mut result, "date_found", "2024-03-01");
        assert!(result.is_valid);

        check_past_date(&mut result, "date_found", "03/01/2024");
        check_past_date(&mut result, "date_lost", "2999-01-01");
        assert!(result.has_error("date_found"));
        assert!(result.has_error("date_lost"));
    }

    #[test]
    fn test_check_phone_and_email() {
        let mut result = ValidationResult::new();
        check_phone(&mut result, "phone", "+1 (555) 010-2030");
        check_email(&mut result, "email", "finder@campus.edu");
        assert!(result.is_valid);

        check_phone(&mut result, "bad_phone", "call me");
        check_email(&mut result, "bad_email", "finder@campus");
        assert!(result.has_error("bad_phone"));
        assert!(result.has_error("bad_email"));
    }

    #[test]
    fn test_merge_keeps_errors_from_both_sides() {
        let mut left = ValidationResult::new();
        left.add_error("a", "bad a");
        let mut right = ValidationResult::new();
        right.add_error("b", "bad b");

        left.merge(right);
        assert_eq!(left.errors.len(), 2);
        assert!(left.has_error("b"));
    }
}
