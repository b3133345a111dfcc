//! Storage layer for Pastebox.
//!
//! This module defines the `Database` record store, its configuration, and
//! the backends it can drive.
//!
//! ## Architecture
//!
//! The record store is backend-agnostic:
//! - SQLite (file or in-memory) via `rusqlite`, driven on the blocking pool
//! - PostgreSQL via `sqlx`
//!
//! All backends implement the `TextBackend` trait; `Database` owns exactly one
//! backend session between `connect` and `disconnect`.
//!
//! ## Security
//!
//! When encryption is enabled the record store is responsible for:
//! - Storing identifier fingerprints instead of plaintext identifiers
//! - Encrypting content with a per-record derived key
//! - Reporting undecryptable records exactly like missing ones

pub mod config;
pub mod database;
pub mod postgres;
pub mod row;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;
pub mod url;
pub mod validation;

// Re-export public types
pub use self::url::{DatabaseUrl, SqliteLocation};
pub use config::StoreConfig;
pub use database::Database;
pub use row::TextRow;
pub use schema::{Dialect, Schema, Statements};
pub use traits::{BackendError, BackendResult, TextBackend};
pub use types::{NewText, Text};
