//! Tutorbot CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tutorbot::cli::{commands, Cli, Commands};
use tutorbot::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tutorbot={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Ask {
            question,
            scope,
            generation,
        } => {
            commands::run_ask(question, scope, generation, settings).await?;
        }

        Commands::Chat { scope, generation } => {
            commands::run_chat(scope, generation, settings).await?;
        }

        Commands::List { scope } => {
            commands::run_list(scope, settings)?;
        }

        Commands::Sets => {
            commands::run_sets(settings)?;
        }

        Commands::Index { dir, output } => {
            commands::run_index(dir, output.clone(), settings).await?;
        }

        Commands::Doctor => {
            let path = config_path.clone().unwrap_or_else(Settings::default_config_path);
            commands::run_doctor(&settings, &path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
