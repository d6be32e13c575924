//! Content hashing.
//!
//! Snapshot fingerprints hash the identity-free shape of a snapshot, so two
//! derivations over structurally identical inputs compare equal even though
//! their dataset identities differ.

mod hash;
pub use hash::{compute_hash, short_hash};
