//! Storage backend trait definition.
//!
//! The `TextBackend` trait is the seam between the `Database` record store
//! and a concrete SQL driver. Backends deal only in persisted rows and
//! storage keys; encryption, fingerprints and validation stay in the record
//! store. Driver errors are translated into `BackendError` before they leave
//! a backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::row::TextRow;
use crate::error::PasteError;

/// Result type alias for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Driver-independent backend failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Primary key or unique constraint violated on insert
    Duplicate,

    /// Recoverable failure; any open transaction has been rolled back
    Transient(String),

    /// The store could not be opened or initialized
    Unavailable(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Duplicate => write!(f, "uniqueness violation"),
            BackendError::Transient(message) => write!(f, "{}", message),
            BackendError::Unavailable(message) => write!(f, "{}", message),
        }
    }
}

impl From<BackendError> for PasteError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Duplicate => {
                PasteError::Transient("Unexpected uniqueness violation".to_string())
            }
            BackendError::Transient(message) => PasteError::Transient(message),
            BackendError::Unavailable(message) => PasteError::StorageUnavailable(message),
        }
    }
}

/// Storage backend interface for the texts table.
///
/// All implementations must ensure:
/// - Every mutation runs in its own transaction
/// - A failed mutation is rolled back before the error is returned
/// - Rows are matched by exact storage key equality
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Create the texts table and its indexes if they do not exist.
    async fn create_schema(&self) -> BackendResult<()>;

    /// Insert a row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Duplicate` if the storage key already exists.
    async fn insert(&self, row: TextRow) -> BackendResult<()>;

    /// Fetch a row by storage key.
    async fn fetch(&self, key: &str) -> BackendResult<Option<TextRow>>;

    /// Delete a row by storage key, returning the number of rows removed.
    async fn delete(&self, key: &str) -> BackendResult<u64>;

    /// Delete rows whose `expires` is set and strictly before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> BackendResult<u64>;

    /// Delete rows whose `created` is strictly before `cutoff`.
    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> BackendResult<u64>;

    /// Release the session. The backend must not be used afterwards.
    async fn close(&self) -> BackendResult<()>;
}

/// Log a SQL statement when statement echo is enabled.
pub(crate) fn echo_sql(enabled: bool, sql: &str) {
    if enabled {
        tracing::info!(target: "pastebox_core::sql", "{}", sql.trim());
    }
}
