//! Error types for Pastebox core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Database driver errors never appear here: backends translate them before
//! they reach the record store, and the CLI layer maps these variants to
//! user-facing messages and exit codes.

use thiserror::Error;

/// Result type alias for Pastebox operations.
pub type Result<T> = std::result::Result<T, PasteError>;

/// Core error type for Pastebox operations.
#[derive(Debug, Error)]
pub enum PasteError {
    /// Identifier or content failed field validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A record with the same identifier already exists
    #[error("Duplicated {object_type}: {object_id}")]
    Duplicated {
        object_type: &'static str,
        object_id: String,
    },

    /// No readable record matches the identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Recoverable backend failure; the transaction was rolled back
    #[error("Transient storage error: {0}")]
    Transient(String),

    /// Operation attempted without an active connection
    #[error("Database is not connected")]
    NotConnected,

    /// Invalid store configuration (URL scheme, secret, KDF parameters)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backing store could not be opened or initialized
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Ciphertext could not be authenticated with the derived key
    #[error("Invalid ciphertext")]
    InvalidCiphertext,

    /// Key derivation or cipher setup failure
    #[error("Encryption error: {0}")]
    Crypto(String),
}

impl PasteError {
    /// Whether the caller may retry the failed operation unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, PasteError::Transient(_))
    }

    pub(crate) fn duplicated_text(text_id: impl Into<String>) -> Self {
        PasteError::Duplicated {
            object_type: "text",
            object_id: text_id.into(),
        }
    }
}
