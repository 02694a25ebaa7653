// src/services/mod.rs
//
// Adapters for the external systems the API delegates to:
// Google sign-in and object storage

pub mod google;
pub mod storage;

pub use google::GoogleService;
