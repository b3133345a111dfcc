//! # Pastebox Core
//!
//! Core library for Pastebox - a store for short-lived, optionally encrypted
//! text snippets ("pastes").
//!
//! This crate provides the storage and encryption layer independent of any
//! HTTP or CLI front end.
//!
//! ## Architecture
//!
//! - **crypto**: Per-record key derivation, authenticated encryption and
//!   identifier fingerprints
//! - **storage**: Connection management, schema, record store operations and
//!   the SQLite / PostgreSQL backends
//!
//! ## Example
//!
//! ```no_run
//! use pastebox_core::storage::{Database, NewText, StoreConfig};
//!
//! # async fn demo() -> pastebox_core::Result<()> {
//! let mut database = Database::new(StoreConfig::new("sqlite:///:memory:"))?;
//! database.connect().await?;
//!
//! let text = database.add_text(NewText::new(None, "hello")?).await?;
//! let fetched = database.get_text(&text.text_id).await?;
//! assert_eq!(fetched.content, "hello");
//!
//! database.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod storage;

pub use error::{PasteError, Result};
pub use storage::{Database, NewText, StoreConfig, Text};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
