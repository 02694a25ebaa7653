//! # Files Module
//!
//! Serves uploads stored on local disk. With S3 storage the stored URLs point
//! at the bucket (or CloudFront) and this route answers 404.

pub mod handlers;
pub mod routes;

#[cfg(test)]
mod tests;

pub use routes::files_routes;
