//! The record store and its connection lifecycle.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use super::config::StoreConfig;
use super::postgres::PostgresBackend;
use super::row::TextRow;
use super::schema::{Dialect, Schema};
use super::sqlite::SqliteBackend;
use super::traits::{BackendError, TextBackend};
use super::types::{NewText, Text};
use super::url::DatabaseUrl;
use super::validation::validate_content_length;
use crate::crypto::{fingerprint, open_content, seal_content};
use crate::error::{PasteError, Result};

/// Encryption settings of an encrypted store.
struct Encryption {
    secret: SecretString,
    iterations: u32,
}

impl Encryption {
    /// Copy of the secret that can move onto the blocking pool.
    fn secret_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.secret.expose_secret().as_bytes().to_vec())
    }
}

/// A text store bound to one database.
///
/// A `Database` is created disconnected. [`connect`](Database::connect) opens
/// a single session that every operation shares until
/// [`disconnect`](Database::disconnect); operations on a disconnected store
/// fail with [`PasteError::NotConnected`].
///
/// With encryption enabled, rows are keyed by the SHA-256 fingerprint of the
/// identifier and content is sealed with a key derived from the server
/// secret, the identifier and a per-record salt. A record that cannot be
/// decrypted is reported exactly like a missing one.
///
/// Rows are only ever written through the record store; the backend session
/// is not reachable from outside the crate:
///
/// ```compile_fail
/// # async fn raw(db: &pastebox_core::Database) {
/// let _ = db.backend();
/// # }
/// ```
pub struct Database {
    url: DatabaseUrl,
    schema: Schema,
    create_schema: bool,
    echo: bool,
    encryption: Option<Encryption>,
    max_content_length: Option<usize>,
    backend: Option<Box<dyn TextBackend>>,
}

impl Database {
    /// Build a disconnected store from `config`.
    ///
    /// # Errors
    ///
    /// Returns `PasteError::Configuration` for an unsupported or malformed
    /// URL, an invalid table name, or inconsistent encryption settings.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let url: DatabaseUrl = config.url.parse()?;
        let schema = Schema::new(config.table)?;

        let encryption = match (config.encrypted, config.secret) {
            (true, Some(secret)) => Some(Encryption {
                secret,
                iterations: config.kdf_iterations,
            }),
            _ => None,
        };

        Ok(Self {
            url,
            schema,
            create_schema: config.create_schema,
            echo: config.echo,
            encryption,
            max_content_length: config.max_content_length,
            backend: None,
        })
    }

    /// Open the session, creating the schema if configured to.
    ///
    /// Connecting a connected store does nothing.
    ///
    /// # Errors
    ///
    /// Returns `PasteError::StorageUnavailable` if the database cannot be
    /// opened or its tables cannot be created.
    pub async fn connect(&mut self) -> Result<()> {
        if self.backend.is_some() {
            return Ok(());
        }

        let backend: Box<dyn TextBackend> = match &self.url {
            DatabaseUrl::Sqlite(location) => Box::new(
                SqliteBackend::open(
                    location.clone(),
                    self.schema.statements(Dialect::Sqlite),
                    self.echo,
                )
                .await
                .map_err(unavailable)?,
            ),
            DatabaseUrl::Postgres(url) => Box::new(
                PostgresBackend::connect(url, self.schema.statements(Dialect::Postgres), self.echo)
                    .await
                    .map_err(unavailable)?,
            ),
        };

        if self.create_schema {
            if let Err(e) = backend.create_schema().await {
                if let Err(close_err) = backend.close().await {
                    tracing::warn!(error = %close_err, "Failed to close session after schema error");
                }
                return Err(unavailable(e));
            }
        }

        tracing::info!(
            url = %self.url,
            table = self.schema.table(),
            encrypted = self.is_encrypted(),
            "Connected to database"
        );
        self.backend = Some(backend);
        Ok(())
    }

    /// Release the session. Disconnecting a disconnected store does nothing.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(backend) = self.backend.take() {
            backend.close().await?;
            tracing::info!(url = %self.url, "Disconnected from database");
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption.is_some()
    }

    pub fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The active backend session.
    ///
    /// # Errors
    ///
    /// Returns `PasteError::NotConnected` outside `connect`/`disconnect`.
    pub(crate) fn backend(&self) -> Result<&dyn TextBackend> {
        self.backend.as_deref().ok_or(PasteError::NotConnected)
    }

    /// Storage key for a plaintext identifier.
    pub(crate) fn lookup_key(&self, text_id: &str) -> String {
        if self.is_encrypted() {
            fingerprint(text_id)
        } else {
            text_id.to_string()
        }
    }

    /// Store a new text and return it as read back from the database.
    ///
    /// # Errors
    ///
    /// - `PasteError::Validation` if the content exceeds the store's limit
    /// - `PasteError::Duplicated` if the identifier is already taken
    /// - `PasteError::Transient` if the insert failed and was rolled back
    pub async fn add_text(&self, text: NewText) -> Result<Text> {
        let backend = self.backend()?;
        if let Some(max_chars) = self.max_content_length {
            validate_content_length(text.content(), max_chars)?;
        }

        let row = self.seal(&text).await?;
        let key = row.text_id.clone();
        match backend.insert(row).await {
            Ok(()) => tracing::debug!(key = %key, "Stored text"),
            Err(BackendError::Duplicate) => {
                tracing::debug!(key = %key, "Text identifier already taken");
                return Err(PasteError::duplicated_text(text.text_id()));
            }
            Err(e) => return Err(rolled_back("add_text", e)),
        }

        self.get_text(text.text_id()).await
    }

    /// Fetch and, if needed, decrypt a text.
    ///
    /// # Errors
    ///
    /// Returns `PasteError::NotFound` if no record exists or the record
    /// cannot be decrypted with the given identifier.
    pub async fn get_text(&self, text_id: &str) -> Result<Text> {
        let backend = self.backend()?;
        if text_id.trim().is_empty() {
            return Err(not_found(text_id));
        }

        let key = self.lookup_key(text_id);
        let row = backend
            .fetch(&key)
            .await
            .map_err(|e| rolled_back("get_text", e))?
            .ok_or_else(|| not_found(text_id))?;

        let content = match (&self.encryption, row.salt) {
            (Some(encryption), Some(salt)) => {
                let secret = encryption.secret_bytes();
                let iterations = encryption.iterations;
                let identifier = text_id.to_string();
                let stored = row.content;
                let opened = tokio::task::spawn_blocking(move || {
                    open_content(&secret, &identifier, &salt, &stored, iterations)
                })
                .await
                .map_err(|e| PasteError::Crypto(format!("Decryption task failed: {}", e)))?;

                match opened {
                    Ok(content) => content,
                    Err(_) => {
                        tracing::debug!(key = %key, "Stored text could not be decrypted");
                        return Err(not_found(text_id));
                    }
                }
            }
            (None, None) => row.content,
            _ => {
                tracing::debug!(key = %key, "Stored text does not match encryption mode");
                return Err(not_found(text_id));
            }
        };

        Ok(Text {
            text_id: text_id.to_string(),
            content,
            created: row.created,
            expires: row.expires,
        })
    }

    /// Delete a text.
    ///
    /// # Errors
    ///
    /// - `PasteError::NotFound` if no record matches
    /// - `PasteError::Transient` if the delete failed and was rolled back
    pub async fn delete_text(&self, text_id: &str) -> Result<()> {
        let backend = self.backend()?;
        if text_id.trim().is_empty() {
            return Err(not_found(text_id));
        }

        let key = self.lookup_key(text_id);
        let removed = backend
            .delete(&key)
            .await
            .map_err(|e| rolled_back("delete_text", e))?;
        if removed == 0 {
            return Err(not_found(text_id));
        }

        tracing::debug!(key = %key, "Deleted text");
        Ok(())
    }

    /// Delete every text whose expiry has passed, returning how many went.
    pub async fn purge_expired(&self) -> Result<u64> {
        let backend = self.backend()?;
        let purged = backend
            .purge_expired(Utc::now())
            .await
            .map_err(|e| rolled_back("purge_expired", e))?;

        tracing::info!(purged, "Purged expired texts");
        Ok(purged)
    }

    /// Delete every text created strictly before `cutoff`.
    pub async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let backend = self.backend()?;
        let purged = backend
            .purge_created_before(cutoff)
            .await
            .map_err(|e| rolled_back("purge_created_before", e))?;

        tracing::info!(purged, cutoff = %cutoff, "Purged texts by age");
        Ok(purged)
    }

    /// Turn a validated text into its persisted row.
    async fn seal(&self, text: &NewText) -> Result<TextRow> {
        let Some(encryption) = &self.encryption else {
            return Ok(TextRow {
                text_id: text.text_id().to_string(),
                content: text.content().to_string(),
                salt: None,
                created: text.created(),
                expires: text.expires(),
            });
        };

        let secret = encryption.secret_bytes();
        let iterations = encryption.iterations;
        let identifier = text.text_id().to_string();
        let content = Zeroizing::new(text.content().to_string());
        let sealed = tokio::task::spawn_blocking(move || {
            seal_content(&secret, &identifier, &content, iterations)
        })
        .await
        .map_err(|e| PasteError::Crypto(format!("Encryption task failed: {}", e)))??;

        Ok(TextRow {
            text_id: fingerprint(text.text_id()),
            content: sealed.content,
            salt: Some(sealed.salt),
            created: text.created(),
            expires: text.expires(),
        })
    }

    #[cfg(test)]
    fn attach(&mut self, backend: Box<dyn TextBackend>) {
        self.backend = Some(backend);
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("url", &self.url)
            .field("table", &self.schema.table())
            .field("encrypted", &self.is_encrypted())
            .field("connected", &self.is_connected())
            .finish()
    }
}

fn not_found(text_id: &str) -> PasteError {
    PasteError::NotFound(format!("text {:?}", text_id))
}

fn unavailable(err: BackendError) -> PasteError {
    PasteError::StorageUnavailable(err.to_string())
}

fn rolled_back(operation: &'static str, err: BackendError) -> PasteError {
    tracing::warn!(operation, error = %err, "Storage operation failed");
    err.into()
}
