use std::io;

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{days, log, plan};
use wl_cli::{Cli, Commands, Config};

/// Today's date in the configured timezone, falling back to UTC.
fn today(config: &Config) -> chrono::NaiveDate {
    let now = Utc::now();
    config
        .timezone
        .parse::<Tz>()
        .map_or_else(|_| now.date_naive(), |tz| now.with_timezone(&tz).date_naive())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let today = today(&config);

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Days(args)) => {
            days::run(&mut stdout, &config, args, today)?;
        }
        Some(Commands::Plan(args)) => {
            plan::run(&mut stdout, &config, args, today)?;
        }
        Some(Commands::Log { plan, yes }) => {
            let mut stdin = io::stdin().lock();
            let outcome = log::run(&mut stdin, &mut stdout, &config, plan, *yes, today)?;
            tracing::debug!(?outcome, "log finished");
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
