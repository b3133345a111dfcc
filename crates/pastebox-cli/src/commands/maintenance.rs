use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use pastebox_core::Database;

use crate::app::AppContext;
use crate::cli::{PurgeArgs, WatchArgs};
use crate::errors::CliError;
use crate::output::print_json;

pub async fn handle_purge(ctx: &AppContext<'_>, args: &PurgeArgs) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let cutoff = if args.by_age {
        Some(age_cutoff(config.dayspan)?)
    } else {
        None
    };
    let mut database = ctx.open_database(&config).await?;

    let result = purge_once(&database, cutoff).await;
    database.disconnect().await?;
    let (expired, aged) = result?;

    if args.json {
        return print_json(&serde_json::json!({
            "expired": expired,
            "by_age": aged,
        }));
    }
    if ctx.quiet() {
        println!("{}", expired + aged.unwrap_or(0));
    } else {
        println!("Purged {} expired text(s)", expired);
        if let Some(aged) = aged {
            println!("Purged {} text(s) older than {} days", aged, config.dayspan);
        }
    }
    Ok(())
}

pub async fn handle_watch(ctx: &AppContext<'_>, args: &WatchArgs) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut database = ctx.open_database(&config).await?;
    let mut ticker = tokio::time::interval(StdDuration::from_secs(args.interval));

    tracing::info!(interval_secs = args.interval, "Watching for expired texts");
    if !ctx.quiet() {
        eprintln!(
            "Purging expired texts every {}s. Press Ctrl-C to stop.",
            args.interval
        );
    }

    let outcome = loop {
        tokio::select! {
            _ = ticker.tick() => {
                match purge_once(&database, None).await {
                    Ok((purged, _)) => tracing::debug!(purged, "Purge cycle complete"),
                    Err(e) if e.is_transient() => {
                        tracing::warn!(error = %e, "Purge cycle failed, retrying next cycle");
                    }
                    Err(e) => break Err(e),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                break Ok(());
            }
        }
    };

    database.disconnect().await?;
    outcome?;
    if !ctx.quiet() {
        eprintln!("Stopped.");
    }
    Ok(())
}

/// Creation cutoff for `purge --by-age`.
fn age_cutoff(dayspan: u32) -> anyhow::Result<DateTime<Utc>> {
    Utc::now()
        .checked_sub_signed(Duration::days(i64::from(dayspan)))
        .ok_or_else(|| {
            CliError::invalid_input(format!("dayspan of {} days is out of range", dayspan)).into()
        })
}

/// Purge expired texts, and texts created before `cutoff` when given.
async fn purge_once(
    database: &Database,
    cutoff: Option<DateTime<Utc>>,
) -> pastebox_core::Result<(u64, Option<u64>)> {
    let expired = database.purge_expired().await?;
    let aged = match cutoff {
        Some(cutoff) => Some(database.purge_created_before(cutoff).await?),
        None => None,
    };
    Ok((expired, aged))
}
