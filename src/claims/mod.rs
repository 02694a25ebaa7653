//! # Claims Module
//!
//! Ownership claims on found items:
//! - Claim form with item images, a claimant picture and a purchase receipt
//! - Per-type ownership questions stored as typed evidence
//! - Admin review where approval hands the item over

pub mod evidence;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use routes::claims_routes;
pub use workflow::ClaimStatus;
