//! Shared key generation for storage backends.
//!
//! Key format: `public/{category}-{epoch_millis}-{suffix}.jpg` with a seven character
//! base36 suffix. Uniqueness is probabilistic; the store is never asked whether a key
//! is taken.

use fleet_core::constants::{KEY_SUFFIX_LEN, PUBLIC_KEY_PREFIX};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a storage key for `category` at the given instant.
pub fn generate_evidence_key(category: &str, epoch_millis: i64) -> String {
    format!(
        "{}{}-{}-{}.jpg",
        PUBLIC_KEY_PREFIX,
        category,
        epoch_millis,
        random_suffix()
    )
}

/// Generate a storage key for `category` using the current wall clock.
pub fn new_evidence_key(category: &str) -> String {
    generate_evidence_key(category, chrono::Utc::now().timestamp_millis())
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..KEY_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}
