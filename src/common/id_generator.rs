// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., CL_K7NP3X for claims)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - ~1 billion combinations per entity type (32^6)
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Found item report (FI_)
    FoundItem,
    /// Lost item report (LI_)
    LostItem,
    /// Ownership claim (CL_)
    Claim,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::FoundItem => "FI",
            EntityPrefix::LostItem => "LI",
            EntityPrefix::Claim => "CL",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// # Arguments
/// * `prefix` - The entity type prefix
///
/// # Returns
/// A string in format "PREFIX_XXXXXX" (e.g., "CL_K7NP3X")
///
/// # Example
/// ```
/// use crate::common::id_generator::{generate_id, EntityPrefix};
///
/// let claim_id = generate_id(EntityPrefix::Claim);
/// // Returns something like "CL_K7NP3X"
/// ```
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix
/// Used for storage object names
///
/// # Arguments
/// * `length` - Number of random characters
///
/// # Example
/// ```
/// let random_str = generate_raw_id(8);
/// // Returns something like "K7NP3XY2"
/// ```
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

// ============================================================================
// Convenience functions for each entity type
// ============================================================================

/// Generate a User ID (U_XXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate a Found Item ID (FI_XXXXXX)
pub fn generate_found_item_id() -> String {
    generate_id(EntityPrefix::FoundItem)
}

/// Generate a Lost Item ID (LI_XXXXXX)
pub fn generate_lost_item_id() -> String {
    generate_id(EntityPrefix::LostItem)
}

/// Generate a Claim ID (CL_XXXXXX)
pub fn generate_claim_id() -> String {
    generate_id(EntityPrefix::Claim)
}
