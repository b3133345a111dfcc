//! Cryptographic operations for Pastebox.
//!
//! This module provides per-record encryption services built on
//! well-audited RustCrypto primitives:
//! - **PBKDF2-HMAC-SHA256**: salted, iterated key derivation
//! - **XChaCha20-Poly1305**: authenticated encryption
//! - **SHA-256**: one-way identifier fingerprints
//!
//! ## Security Model
//!
//! - Each record's key is derived from the server secret, the record's
//!   plaintext identifier and a random per-record salt
//! - Keys are never cached or persisted; every read re-derives
//! - The stored primary key is a fingerprint, never the plaintext identifier
//! - Key material is zeroized from memory on drop
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the database (blob + salt without identifier and secret)
//! - Enumeration of stored pastes by guessing identifiers
//! - Tampering with stored ciphertext or salts
//!
//! We do NOT defend against:
//! - Compromise of the running server process
//! - Weak, guessable paste identifiers combined with a leaked secret

pub mod cipher;
pub mod fingerprint;
pub mod key;

pub use cipher::{decrypt, encrypt, open_content, seal_content, SealedContent};
pub use fingerprint::fingerprint;
pub use key::{derive_key, generate_salt, DerivedKey, DEFAULT_KDF_ITERATIONS};
