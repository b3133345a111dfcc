//! Text row type for database queries.

use chrono::{DateTime, Utc};

use super::traits::{BackendError, BackendResult};

/// A row of the texts table, in its persisted form.
///
/// In encrypted mode `text_id` holds the identifier fingerprint and
/// `content` the base64 ciphertext token; `salt` is `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow {
    pub text_id: String,
    pub content: String,
    pub salt: Option<String>,
    pub created: DateTime<Utc>,
    pub expires: Option<DateTime<Utc>>,
}

/// Encode a timestamp for integer-typed timestamp columns.
///
/// Microseconds since the Unix epoch. Every `DateTime<Utc>` chrono can
/// represent fits in an `i64`, and integer order is chronological order,
/// which the purge queries rely on.
pub fn timestamp_to_micros(value: DateTime<Utc>) -> i64 {
    value.timestamp_micros()
}

/// Decode a timestamp written by [`timestamp_to_micros`].
pub fn timestamp_from_micros(micros: i64) -> BackendResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| BackendError::Transient(format!("Invalid timestamp: {}", micros)))
}
