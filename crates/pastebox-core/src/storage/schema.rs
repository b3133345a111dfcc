//! Table definitions for the texts table.
//!
//! A `Schema` is owned by the `Database` and rendered once per backend into
//! the dialect-specific `Statements` that backend executes.

use crate::error::{PasteError, Result};

/// SQL dialect of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Sqlite => format!("?{}", index),
            Dialect::Postgres => format!("${}", index),
        }
    }

    fn timestamp_type(self) -> &'static str {
        match self {
            // Epoch microseconds, see `row::timestamp_to_micros`
            Dialect::Sqlite => "INTEGER",
            Dialect::Postgres => "TIMESTAMPTZ",
        }
    }
}

/// Descriptor of the texts table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table: String,
}

impl Schema {
    pub const DEFAULT_TABLE: &'static str = "texts";

    /// Describe a texts table with a custom name.
    ///
    /// # Errors
    ///
    /// Returns `PasteError::Configuration` unless the name is a plain SQL
    /// identifier (ASCII letter or underscore, then letters, digits, underscores).
    pub fn new(table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        let mut chars = table.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PasteError::Configuration(format!(
                "Invalid table name: {:?}",
                table
            )));
        }
        Ok(Self { table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render every statement a backend needs for `dialect`.
    pub fn statements(&self, dialect: Dialect) -> Statements {
        let table = &self.table;
        let ts = dialect.timestamp_type();
        let p = |index| dialect.placeholder(index);

        Statements {
            create: vec![
                format!(
                    r#"
                    CREATE TABLE IF NOT EXISTS {table} (
                        text_id TEXT PRIMARY KEY,
                        content TEXT NOT NULL,
                        salt TEXT,
                        created {ts} NOT NULL,
                        expires {ts}
                    )
                    "#
                ),
                format!("CREATE INDEX IF NOT EXISTS {table}_expires ON {table} (expires)"),
            ],
            insert: format!(
                "INSERT INTO {table} (text_id, content, salt, created, expires) VALUES ({}, {}, {}, {}, {})",
                p(1),
                p(2),
                p(3),
                p(4),
                p(5)
            ),
            select: format!(
                "SELECT text_id, content, salt, created, expires FROM {table} WHERE text_id = {}",
                p(1)
            ),
            delete: format!("DELETE FROM {table} WHERE text_id = {}", p(1)),
            purge_expired: format!(
                "DELETE FROM {table} WHERE expires IS NOT NULL AND expires < {}",
                p(1)
            ),
            purge_created_before: format!("DELETE FROM {table} WHERE created < {}", p(1)),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            table: Self::DEFAULT_TABLE.to_string(),
        }
    }
}

/// Dialect-specific SQL for the texts table.
///
/// Parameter order: `insert` takes (text_id, content, salt, created, expires);
/// every other statement takes a single parameter.
#[derive(Debug, Clone)]
pub struct Statements {
    pub create: Vec<String>,
    pub insert: String,
    pub select: String,
    pub delete: String,
    pub purge_expired: String,
    pub purge_created_before: String,
}
