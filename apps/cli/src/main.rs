#![allow(clippy::print_stdout)]

use anyhow::Result;
use clap::Parser;
use tessera_cli::args::Cli;
use tessera_cli::{DEFAULT_LOG_LEVEL, cli_settings};
use tessera_logger::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = cli_settings(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().or(settings.log.level.as_deref()).unwrap_or(DEFAULT_LOG_LEVEL);
    let _logger = Logger::from_settings("tessera", &settings.log, Some(level))?;

    let output = tessera_cli::run(&cli).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
