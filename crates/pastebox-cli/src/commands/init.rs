use crate::app::{resolve_database_url, AppContext};
use crate::cli::InitConfigArgs;
use crate::config::{write_config, PasteboxConfig};
use crate::errors::CliError;

pub fn handle_init_config(ctx: &AppContext<'_>, args: &InitConfigArgs) -> anyhow::Result<()> {
    let config_path = ctx.config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config file already exists: {}\nHint: Use --force to overwrite it.",
            config_path.display()
        ))
        .into());
    }

    let database_url = resolve_database_url(ctx.cli(), &PasteboxConfig::default())?;
    write_config(&config_path, &PasteboxConfig::initial(database_url))?;

    if !ctx.quiet() {
        println!("Wrote config to {}", config_path.display());
    }
    Ok(())
}
