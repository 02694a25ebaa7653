//! # Lost Items Module
//!
//! Reports of items their owners lost, with up to three pictures and an
//! optional proof of ownership, plus the admin listing and status edits.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::LostItemStatus;
pub use routes::lost_items_routes;
