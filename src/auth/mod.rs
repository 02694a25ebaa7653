//! # Auth Module
//!
//! Google sign-in, JWT issuance and validation, the `AuthedUser`
//! extractor for protected routes, and the pluggable admin policy.

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;


pub use extractors::AuthedUser;
pub use models::User;
pub use policy::{AdminAllowList, AuthorizationPolicy};
pub use routes::auth_routes;
