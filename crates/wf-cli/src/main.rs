use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wf_cli::commands::report::ReportOptions;
use wf_cli::commands::{check, report};
use wf_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Report {
            file,
            json,
            no_activities,
            strict,
        }) => {
            let options = ReportOptions {
                json: *json,
                show_activities: config.show_activities && !no_activities,
                strict: *strict || config.strict,
            };
            report::run(&mut stdout, file, options)?;
        }
        Some(Commands::Check { file, strict }) => {
            check::run(&mut stdout, file, *strict || config.strict)?;
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
