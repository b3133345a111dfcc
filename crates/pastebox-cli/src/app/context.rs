//! Application context for the Pastebox CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! config file and opens the store on demand.

use std::path::PathBuf;

use anyhow::Context;
use pastebox_core::Database;

use crate::cli::Cli;
use crate::config::{load_config, PasteboxConfig};

use super::resolver::{resolve_config_path, resolve_store_config};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        resolve_config_path(self.cli)
    }

    /// Load the config file, or defaults when it does not exist.
    pub fn config(&self) -> anyhow::Result<PasteboxConfig> {
        load_config(&self.config_path()?)
    }

    /// Build and connect the store described by the CLI and config.
    pub async fn open_database(&self, config: &PasteboxConfig) -> anyhow::Result<Database> {
        let store_config = resolve_store_config(self.cli, config)?;
        let mut database = Database::new(store_config).context("Invalid store configuration")?;
        let url = database.url().to_string();
        database
            .connect()
            .await
            .with_context(|| format!("Failed to open database {}", url))?;
        Ok(database)
    }
}
