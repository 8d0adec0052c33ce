mod cli;
mod commands;
mod draft;
mod output;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug};

use admin::{AdminConfig, AdminState, HttpApi};
use cli::Cli;
use output::ConsoleNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AdminConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    debug!(base_url = %config.api.base_url, "Config loaded");

    let api = HttpApi::new(&config.api).context("Failed to build HTTP client")?;
    let state = AdminState::new(Arc::new(api), Arc::new(ConsoleNotifier::new()), config.rules);

    let code = commands::dispatch(cli.command, &state, &config.smoke).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
