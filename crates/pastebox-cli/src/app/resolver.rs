//! Resolution of the config file and store settings.

use std::path::PathBuf;

use pastebox_core::StoreConfig;

use crate::cli::Cli;
use crate::config::{default_config_path, default_database_path, sqlite_url, PasteboxConfig};
use crate::errors::CliError;

/// Resolve the config file path: `--config` / `PASTEBOX_CONFIG`, then the XDG default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.config {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
        _ => default_config_path(),
    }
}

/// Resolve the database URL from CLI args, config, or the default data file.
///
/// The data directory is created when the default location is used.
pub fn resolve_database_url(cli: &Cli, config: &PasteboxConfig) -> anyhow::Result<String> {
    if let Some(url) = cli.database_url.as_ref().filter(|url| !url.trim().is_empty()) {
        return Ok(url.clone());
    }
    if let Some(url) = config.database.url.as_ref() {
        return Ok(url.clone());
    }

    let path = default_database_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create data directory {}: {}", parent.display(), e)
        })?;
    }
    Ok(sqlite_url(&path))
}

/// Build the store configuration for this invocation.
pub fn resolve_store_config(cli: &Cli, config: &PasteboxConfig) -> anyhow::Result<StoreConfig> {
    let database = &config.database;
    let mut store = StoreConfig::new(resolve_database_url(cli, config)?)
        .with_create_schema(database.create)
        .with_echo(database.echo)
        .with_kdf_iterations(database.iterations);

    if config.maxlength > 0 {
        store = store.with_max_content_length(config.maxlength);
    }

    if database.encrypted {
        let secret = cli
            .secret
            .clone()
            .or_else(|| database.secret.clone())
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                CliError::invalid_input(
                    "Encryption is enabled but no secret is configured.\nHint: Set PASTEBOX_SECRET or `secret` under [database].",
                )
            })?;
        store = store.with_encryption(secret);
    }

    Ok(store)
}
