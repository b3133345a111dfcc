//! Core data types for the storage layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_content, validate_text_id};
use crate::error::{PasteError, Result};

/// A stored text, as seen by callers.
///
/// Always carries the plaintext identifier and content; storage keys and
/// salts never leave the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// User-facing identifier
    pub text_id: String,

    /// Text content
    pub content: String,

    /// When this text was stored
    pub created: DateTime<Utc>,

    /// When this text becomes eligible for purging
    pub expires: Option<DateTime<Utc>>,
}

/// Builder for creating new texts.
///
/// Construction validates the identifier and content, so a `NewText` that
/// exists is always storable.
#[derive(Debug, Clone)]
pub struct NewText {
    text_id: String,
    content: String,
    created: DateTime<Utc>,
    expires: Option<DateTime<Utc>>,
}

impl NewText {
    /// Create a new text. A missing identifier is replaced by a random UUID.
    ///
    /// # Errors
    ///
    /// Returns `PasteError::Validation` if the identifier or content is blank.
    pub fn new(text_id: Option<String>, content: impl Into<String>) -> Result<Self> {
        let text_id = text_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let content = content.into();
        validate_text_id(&text_id)?;
        validate_content(&content)?;

        Ok(Self {
            text_id,
            content,
            created: Utc::now(),
            expires: None,
        })
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Expire `lifetime` after the creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns `PasteError::Validation` if the expiry falls outside the
    /// representable date range.
    pub fn expires_after(mut self, lifetime: Duration) -> Result<Self> {
        let expires = self.created.checked_add_signed(lifetime).ok_or_else(|| {
            PasteError::Validation(format!(
                "Expiry of {} days is out of range",
                lifetime.num_days()
            ))
        })?;
        self.expires = Some(expires);
        Ok(self)
    }

    pub fn text_id(&self) -> &str {
        &self.text_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }
}
