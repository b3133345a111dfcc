//! Authenticated encryption of paste content.
//!
//! Uses XChaCha20-Poly1305 (192-bit random nonce). Token wire format:
//!   [ nonce (24 bytes) | ciphertext + tag ]
//!
//! Stored content is the standard base64 encoding of the token.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use super::key::{derive_key, generate_salt, DerivedKey};
use crate::error::{PasteError, Result};

/// Associated data binding tokens to this application and format version.
const TOKEN_AAD: &[u8] = b"pastebox-text-v1";

const NONCE_LENGTH: usize = 24;

/// Encrypted content ready to persist, with the salt needed to read it back.
#[derive(Debug, Clone)]
pub struct SealedContent {
    pub salt: String,
    pub content: String,
}

/// Encrypt `plaintext`, prepending a fresh random nonce.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| PasteError::Crypto(format!("Failed to create cipher: {}", e)))?;
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: TOKEN_AAD,
            },
        )
        .map_err(|_| PasteError::Crypto("Encryption failed".to_string()))?;

    let mut token = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    token.extend_from_slice(&nonce);
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// Decrypt a token produced by [`encrypt`].
///
/// Returns `PasteError::InvalidCiphertext` when the token is truncated or
/// fails authentication (wrong key, tampered bytes).
pub fn decrypt(key: &DerivedKey, token: &[u8]) -> Result<Vec<u8>> {
    if token.len() < NONCE_LENGTH {
        return Err(PasteError::InvalidCiphertext);
    }
    let (nonce_bytes, ciphertext) = token.split_at(NONCE_LENGTH);
    let nonce = XNonce::from_slice(nonce_bytes);

    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| PasteError::InvalidCiphertext)?;

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: TOKEN_AAD,
            },
        )
        .map_err(|_| PasteError::InvalidCiphertext)
}

/// Encrypt paste content for storage under a freshly generated salt.
pub fn seal_content(
    secret: &[u8],
    identifier: &str,
    content: &str,
    iterations: u32,
) -> Result<SealedContent> {
    let salt = generate_salt();
    let key = derive_key(secret, identifier, &salt, iterations)?;
    let token = encrypt(&key, content.as_bytes())?;

    Ok(SealedContent {
        salt,
        content: STANDARD.encode(token),
    })
}

/// Recover paste content from its stored form.
///
/// Every failure (bad base64, unusable salt, failed authentication,
/// non-UTF-8 plaintext) collapses into `PasteError::InvalidCiphertext`.
pub fn open_content(
    secret: &[u8],
    identifier: &str,
    salt: &str,
    stored: &str,
    iterations: u32,
) -> Result<String> {
    let token = STANDARD
        .decode(stored)
        .map_err(|_| PasteError::InvalidCiphertext)?;
    let key = derive_key(secret, identifier, salt, iterations)
        .map_err(|_| PasteError::InvalidCiphertext)?;
    let plaintext = decrypt(&key, &token)?;

    String::from_utf8(plaintext).map_err(|_| PasteError::InvalidCiphertext)
}
