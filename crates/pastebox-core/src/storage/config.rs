//! Record store configuration.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::schema::Schema;
use crate::crypto::DEFAULT_KDF_ITERATIONS;
use crate::error::{PasteError, Result};

/// Settings for a [`Database`](super::Database).
///
/// The secret is wiped on drop and never shows up in `Debug` output.
pub struct StoreConfig {
    /// Database URL, see [`DatabaseUrl`](super::DatabaseUrl)
    pub url: String,

    /// Create the table on connect if it is missing
    pub create_schema: bool,

    /// Log every SQL statement at info level
    pub echo: bool,

    /// Encrypt identifiers and content at rest
    pub encrypted: bool,

    /// Server-side secret mixed into every derived key
    pub secret: Option<SecretString>,

    /// PBKDF2-HMAC-SHA256 iteration count
    pub kdf_iterations: u32,

    /// Upper bound on content length, in characters
    pub max_content_length: Option<usize>,

    /// Name of the texts table
    pub table: String,
}

impl StoreConfig {
    /// Plaintext store at `url` with the schema created on connect.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            create_schema: true,
            echo: false,
            encrypted: false,
            secret: None,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            max_content_length: None,
            table: Schema::DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_create_schema(mut self, create_schema: bool) -> Self {
        self.create_schema = create_schema;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Enable encryption at rest with the given server secret.
    pub fn with_encryption(mut self, secret: impl Into<String>) -> Self {
        self.encrypted = true;
        self.secret = Some(SecretString::from(secret.into()));
        self
    }

    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    pub fn with_max_content_length(mut self, max_chars: usize) -> Self {
        self.max_content_length = Some(max_chars);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.kdf_iterations == 0 {
            return Err(PasteError::Configuration(
                "KDF iteration count must be positive".to_string(),
            ));
        }

        let has_secret = self
            .secret
            .as_ref()
            .is_some_and(|secret| !secret.expose_secret().is_empty());
        match (self.encrypted, has_secret) {
            (true, false) => Err(PasteError::Configuration(
                "Encryption requires a non-empty secret".to_string(),
            )),
            (false, true) => Err(PasteError::Configuration(
                "A secret was given but encryption is disabled".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("create_schema", &self.create_schema)
            .field("echo", &self.echo)
            .field("encrypted", &self.encrypted)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("kdf_iterations", &self.kdf_iterations)
            .field("max_content_length", &self.max_content_length)
            .field("table", &self.table)
            .finish()
    }
}
