// Common module - shared types and utilities across all modules

pub mod config;
pub mod dev_mode;
pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod item_type;
pub mod migrations;
pub mod state;
pub mod uploads;
pub mod validation;

#[cfg(test)]
pub mod test_support;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::ApiError;
pub use helpers::{safe_email_log, total_pages, SqlFilter};
pub use id_generator::*;
pub use item_type::ItemType;
pub use state::AppState;
pub use uploads::{MultipartForm, UploadedFile};
pub use validation::{ValidationResult, Validator};
