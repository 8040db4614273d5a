//! # Tessera CLI
//!
//! `tessera [--config FILE] [--log-level LEVEL] <command>`
//!
//! Builds an engine with the built-in validators and the design-system preset,
//! runs one command and returns its output as JSON.

pub mod args;
pub mod handlers;

use crate::args::{Cli, Command};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tessera::kernel::prelude::{EngineConfig, load_config};
use tessera::{Engine, presets};
use tessera_logger::LogSettings;
use tracing::debug;

/// Level used when neither `--log-level` nor `[log] level` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// CLI-only sections of the config file; engine sections are read separately.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    pub log: LogSettings,
}

/// Reads the `[log]` section from `path` (if any) and `TESSERA__LOG__*`.
///
/// # Errors
/// Fails on an unreadable or malformed config source.
pub fn cli_settings(path: Option<&Path>) -> Result<CliSettings> {
    load_config::<CliSettings>(path).context("Failed to load log settings")
}

/// Loads the engine config from `path` (if any) and the `TESSERA__*` environment.
///
/// # Errors
/// Fails on an unreadable or malformed config source.
pub fn engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    load_config::<EngineConfig>(path).context("Failed to load engine config")
}

/// Builds an engine with the design-system preset installed.
///
/// # Errors
/// Fails when the config is rejected or the preset cannot be registered.
pub fn build_engine(config: EngineConfig) -> Result<Engine> {
    let engine = Engine::builder().config(config).build()?;
    presets::install_design_system(&engine)?;
    debug!(domains = ?engine.domain_names(), "Engine ready");
    Ok(engine)
}

/// Runs the parsed command against a fresh engine.
///
/// # Errors
/// Propagates config, parse and engine errors.
pub async fn run(cli: &Cli) -> Result<Value> {
    let engine = build_engine(engine_config(cli.config.as_deref())?)?;

    match &cli.command {
        Command::Resolve { token, value, strict } => handlers::resolve(&engine, token, value, *strict),
        Command::Apply(args) => handlers::apply(&engine, args).await,
        Command::Domains => Ok(handlers::domains(&engine)),
    }
}
