//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Every record gets its own key: the KDF password is the server secret
//! concatenated with the record's plaintext identifier, and the KDF salt is
//! a random value generated when the record is stored.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{PasteError, Result};

/// Default PBKDF2 iteration count.
///
/// Tunable through `StoreConfig::kdf_iterations`; lower values trade
/// brute-force resistance for request latency.
pub const DEFAULT_KDF_ITERATIONS: u32 = 480_000;

/// Length of derived key in bytes (32 bytes = 256 bits for XChaCha20-Poly1305).
const KEY_LENGTH: usize = 32;

/// Random bytes per record salt (hex-encoded when stored).
const SALT_BYTES: usize = 16;

/// A symmetric key derived for a single record.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a record key from the server secret, identifier and salt.
///
/// # Arguments
///
/// * `secret` - Server-wide secret
/// * `identifier` - The record's plaintext identifier
/// * `salt` - The record's stored salt
/// * `iterations` - PBKDF2 round count
///
/// # Security
///
/// - Same inputs always produce the same key (deterministic)
/// - Changing any one of secret, identifier or salt yields an unrelated key
///
/// # Examples
///
/// ```
/// use pastebox_core::crypto::derive_key;
///
/// let key = derive_key(b"server-secret", "my-paste", "0011223344556677", 1_000).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(
    secret: &[u8],
    identifier: &str,
    salt: &str,
    iterations: u32,
) -> Result<DerivedKey> {
    if secret.is_empty() {
        return Err(PasteError::Crypto("Secret cannot be empty".to_string()));
    }

    if salt.is_empty() {
        return Err(PasteError::Crypto("Salt cannot be empty".to_string()));
    }

    if iterations == 0 {
        return Err(PasteError::Crypto(
            "KDF iterations must be greater than zero".to_string(),
        ));
    }

    let mut password = Zeroizing::new(Vec::with_capacity(secret.len() + identifier.len()));
    password.extend_from_slice(secret);
    password.extend_from_slice(identifier.as_bytes());

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(&password, salt.as_bytes(), iterations, &mut key_bytes);

    Ok(DerivedKey::from_bytes(key_bytes))
}

/// Generate a fresh random salt for a new record.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
