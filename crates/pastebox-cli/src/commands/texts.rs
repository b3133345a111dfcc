use chrono::Duration;
use pastebox_core::{NewText, PasteError};

use crate::app::AppContext;
use crate::cli::{AddArgs, DeleteArgs, GetArgs};
use crate::errors::CliError;
use crate::helpers::read_text_body;
use crate::output::{print_json, text_json};

const NOT_FOUND_HINT: &str =
    "Hint: Check the identifier; encrypted texts are only readable with the secret they were stored with.";

pub async fn handle_add(ctx: &AppContext<'_>, args: &AddArgs) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let body = read_text_body(args.body.clone())?;

    let mut text = NewText::new(args.id.clone(), body)?;
    if !args.no_expiry {
        let days = args.expires_in.unwrap_or(config.dayspan);
        text = text.expires_after(Duration::days(i64::from(days)))?;
    }

    let mut database = ctx.open_database(&config).await?;
    let result = database.add_text(text).await;
    database.disconnect().await?;
    let stored = result?;

    if args.json {
        return print_json(&text_json(&stored));
    }
    println!("{}", stored.text_id);
    if !ctx.quiet() {
        if let Some(expires) = stored.expires {
            eprintln!("Expires {}", expires.format("%Y-%m-%d %H:%M UTC"));
        }
    }
    Ok(())
}

pub async fn handle_get(ctx: &AppContext<'_>, args: &GetArgs) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut database = ctx.open_database(&config).await?;
    let result = database.get_text(&args.id).await;
    database.disconnect().await?;
    let text = result.map_err(|e| not_found_with_hint(e, &args.id))?;

    if args.json {
        return print_json(&text_json(&text));
    }
    print!("{}", text.content);
    if !text.content.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub async fn handle_delete(ctx: &AppContext<'_>, args: &DeleteArgs) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut database = ctx.open_database(&config).await?;
    let result = database.delete_text(&args.id).await;
    database.disconnect().await?;
    result.map_err(|e| not_found_with_hint(e, &args.id))?;

    if !ctx.quiet() {
        println!("Deleted {}", args.id);
    }
    Ok(())
}

fn not_found_with_hint(err: PasteError, text_id: &str) -> anyhow::Error {
    match err {
        PasteError::NotFound(_) => {
            CliError::not_found(format!("Text not found: {}", text_id), NOT_FOUND_HINT).into()
        }
        other => other.into(),
    }
}
