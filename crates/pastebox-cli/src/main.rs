//! Pastebox CLI - a store for short-lived, optionally encrypted text snippets
//!
//! This is the operator command-line interface for Pastebox. It drives the
//! core record store: adding, reading and deleting texts, and purging
//! expired ones once or periodically.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, maintenance, texts};
use crate::errors::exit_code;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(verbose > 0)
        .init();
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Add(args) => texts::handle_add(ctx, args).await,
        Commands::Get(args) => texts::handle_get(ctx, args).await,
        Commands::Delete(args) => texts::handle_delete(ctx, args).await,
        Commands::Purge(args) => maintenance::handle_purge(ctx, args).await,
        Commands::Watch(args) => maintenance::handle_watch(ctx, args).await,
        Commands::InitConfig(args) => init::handle_init_config(ctx, args),
    }
}
