//! # CLI Argument Definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tessera")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Resolve design tokens and apply cross-domain customizations")]
pub struct Cli {
    /// Engine config file (TOML, JSON or YAML); `TESSERA__*` variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for stderr output (off, error, warn, info, debug, trace); overrides `[log] level`
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one token change and print its updates
    Resolve {
        /// Token name (e.g. `primary`)
        token: String,
        /// New value (`#1b365d`, `16px`, `1.5`)
        value: String,
        /// Fail on any isolated generator or validator failure
        #[arg(long)]
        strict: bool,
    },
    /// Apply a change set to a domain and its dependents
    Apply(ApplyArgs),
    /// List registered domains
    Domains,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Domain receiving the changes (e.g. `color`)
    pub domain: String,
    /// Changes as `key=value` pairs
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub changes: Vec<String>,
    /// Bypass the per-domain cache
    #[arg(long)]
    pub skip_cache: bool,
    /// Apply only the named domain
    #[arg(long)]
    pub no_propagation: bool,
    /// Mark the result as not for live preview
    #[arg(long)]
    pub skip_preview: bool,
    /// Mark the result as not to be persisted
    #[arg(long)]
    pub skip_persist: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_apply_flags() {
        let cli = Cli::try_parse_from([
            "tessera",
            "--log-level",
            "debug",
            "apply",
            "color",
            "primary=#1b365d",
            "--skip-cache",
            "--no-propagation",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Apply(args) = cli.command else { panic!("expected apply") };
        assert_eq!(args.domain, "color");
        assert_eq!(args.changes, ["primary=#1b365d"]);
        assert!(args.skip_cache && args.no_propagation && !args.skip_persist);
    }

    #[test]
    fn apply_requires_changes() {
        assert!(Cli::try_parse_from(["tessera", "apply", "color"]).is_err());
    }
}
