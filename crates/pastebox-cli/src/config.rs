use std::fmt;
use std::path::{Path, PathBuf};

use pastebox_core::crypto::DEFAULT_KDF_ITERATIONS;
use serde::{Deserialize, Serialize};

use crate::errors::CliError;

/// Days until a newly added text expires.
pub const DEFAULT_DAYSPAN: u32 = 90;

/// Upper bound on `dayspan` and `--expires-in`, about ten thousand years.
pub const MAX_DAYSPAN: u32 = 3_650_000;

/// Maximum text length, in characters.
pub const DEFAULT_MAXLENGTH: usize = 10_000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PasteboxConfig {
    pub dayspan: u32,
    pub maxlength: usize,
    pub database: DatabaseSection,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub create: bool,
    pub echo: bool,
    pub encrypted: bool,
    pub secret: Option<String>,
    pub iterations: u32,
}

impl Default for PasteboxConfig {
    fn default() -> Self {
        Self {
            dayspan: DEFAULT_DAYSPAN,
            maxlength: DEFAULT_MAXLENGTH,
            database: DatabaseSection::default(),
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            create: true,
            echo: false,
            encrypted: false,
            secret: None,
            iterations: DEFAULT_KDF_ITERATIONS,
        }
    }
}

impl fmt::Debug for DatabaseSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSection")
            .field("url", &self.url)
            .field("create", &self.create)
            .field("echo", &self.echo)
            .field("encrypted", &self.encrypted)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("iterations", &self.iterations)
            .finish()
    }
}

impl PasteboxConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.dayspan > MAX_DAYSPAN {
            return Err(CliError::invalid_input(format!(
                "dayspan must be at most {} days, got {}",
                MAX_DAYSPAN, self.dayspan
            ))
            .into());
        }
        Ok(())
    }

    /// Config written by `init-config`, with the database URL spelled out.
    pub fn initial(database_url: String) -> Self {
        Self {
            database: DatabaseSection {
                url: Some(database_url),
                ..DatabaseSection::default()
            },
            ..Self::default()
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("pastebox.db"))
}

/// SQLite URL for a database file.
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite:///{}", path.display())
}

pub fn read_config(path: &Path) -> anyhow::Result<PasteboxConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    let config: PasteboxConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;
    config.validate()?;
    Ok(config)
}

/// Read the config at `path`, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<PasteboxConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(PasteboxConfig::default());
    }
    read_config(path)
}

pub fn write_config(path: &Path, config: &PasteboxConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("pastebox"));
        }
    }
    Ok(home_dir()?.join(".config").join("pastebox"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("pastebox"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("pastebox"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
