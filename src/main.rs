use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use printcost::{config, init_tracing};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Logging level comes from the config file, so load it before tracing is up.
    // Commands that need the config report a load failure themselves.
    let loaded = config::load_config(&args.config);
    let level = loaded
        .as_ref()
        .map(|cfg| cfg.logging.level.clone())
        .unwrap_or_else(|_| config::LoggingConfig::default().level);
    init_tracing(&level);

    // Dispatch to appropriate command handler
    match args.command {
        cli::Commands::Quote(quote) => {
            commands::quote::execute(&loaded?, quote)?;
        }
        cli::Commands::Portfolio {
            input,
            output,
            halt_on_error,
        } => {
            commands::portfolio::execute(&loaded?, &input, output.as_deref(), halt_on_error)?;
        }
        cli::Commands::Template { output } => {
            commands::template::execute(output.as_deref())?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&loaded?)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config, loaded)?,
        },
        cli::Commands::Version => {
            println!("printcost v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
