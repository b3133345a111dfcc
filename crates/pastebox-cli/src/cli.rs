use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use pastebox_core::VERSION;

use crate::config::MAX_DAYSPAN;

/// Pastebox - a store for short-lived, optionally encrypted text snippets
#[derive(Parser)]
#[command(name = "pastebox")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "PASTEBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL (overrides the config file)
    #[arg(long, global = true, env = "PASTEBOX_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Server secret for encrypted stores (overrides the config file)
    #[arg(long, global = true, env = "PASTEBOX_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a new text
    Add(AddArgs),

    /// Print a stored text
    Get(GetArgs),

    /// Delete a stored text
    Delete(DeleteArgs),

    /// Delete every expired text once
    Purge(PurgeArgs),

    /// Purge expired texts periodically until interrupted
    Watch(WatchArgs),

    /// Write a default config file
    InitConfig(InitConfigArgs),
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Text identifier (a random UUID when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Text body (read from stdin when omitted)
    #[arg(long)]
    pub body: Option<String>,

    /// Days until the text expires (defaults to `dayspan`)
    #[arg(
        long,
        value_name = "DAYS",
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DAYSPAN))
    )]
    pub expires_in: Option<u32>,

    /// Store the text without an expiry
    #[arg(long, conflicts_with = "expires_in")]
    pub no_expiry: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `get` command
#[derive(Args)]
pub struct GetArgs {
    /// Text identifier
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Text identifier
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `purge` command
#[derive(Args)]
pub struct PurgeArgs {
    /// Also delete texts created more than `dayspan` days ago
    #[arg(long)]
    pub by_age: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `watch` command
#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between purges
    #[arg(long, value_name = "SECS", default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

/// Arguments for the `init-config` command
#[derive(Args)]
pub struct InitConfigArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}
