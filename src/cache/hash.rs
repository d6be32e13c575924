//! Content hashing for structural fingerprints.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of a value's JSON serialization, as 64 lowercase hex characters.
///
/// Only use this on values whose serialization is deterministic: structs,
/// vectors, and ordered maps. `HashMap` iteration order is not stable.
///
/// # Errors
/// Returns an error if the value cannot be serialized to JSON.
pub fn compute_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Leading characters of a hash, for display.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
