//! One-way identifier fingerprints.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a plaintext identifier.
///
/// Used as the storage key in encrypted mode so the plaintext identifier
/// (which is also part of the content key) never reaches the database.
pub fn fingerprint(identifier: &str) -> String {
    hex::encode(Sha256::digest(identifier.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_vector() {
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_deterministic_and_distinct() {
        assert_eq!(fingerprint("paste"), fingerprint("paste"));
        assert_ne!(fingerprint("paste"), fingerprint("Paste"));
        assert!(!fingerprint("paste").contains("paste"));
    }
}
