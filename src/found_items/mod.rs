//! # Found Items Module
//!
//! Reports of items someone found on campus:
//! - Report form with a required picture
//! - Public gallery with type filter, search and pagination
//! - Admin listing and status corrections

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use models::{FoundItem, FoundItemStatus};
pub use routes::found_items_routes;
