//! # pdctl-safepoint
//!
//! Command-line client for the service GC safepoints held by a PD coordinator.
//!
//! ## Commands
//!
//! - `pdctl service-gc-safepoint` - List service GC safepoints sorted by safepoint
//! - `pdctl service-gc-safepoint delete <service ID>` - Delete a service GC safepoint (hidden)
//!
//! ## Configuration
//!
//! - `PD_ADDR` / `--pd` - Coordinator endpoint (default: `http://127.0.0.1:2379`)
//! - `--timeout` - Request timeout in seconds (default: 30)
//! - `--format` - Listing output format, `json` or `table` (default: `json`)

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod commands;
pub mod error;
pub mod safepoint;

use clap::{Parser, Subcommand};

/// PD control - coordinator administration command-line interface.
#[derive(Debug, Parser)]
#[command(name = "pdctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Coordinator endpoint.
    #[arg(long = "pd", short = 'u', env = "PD_ADDR", default_value = "http://127.0.0.1:2379")]
    pub pd_addr: String,

    /// Request timeout in seconds.
    #[arg(
        long = "timeout",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Output format.
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            pd_addr: self.pd_addr.clone(),
            timeout_secs: self.timeout_secs,
            format: self.format.clone(),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show all service GC safepoints.
    ServiceGcSafepoint(commands::service_gc_safepoint::ServiceGcSafepointArgs),
}

/// Output format.
#[derive(Debug, Clone, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON output.
    #[default]
    Json,
    /// Table output.
    Table,
}

/// CLI configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Coordinator endpoint.
    pub pd_addr: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Output format.
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_from_flags() {
        let cli = Cli::parse_from([
            "pdctl",
            "-u",
            "http://pd-0:2379",
            "--timeout",
            "5",
            "--format",
            "table",
            "service-gc-safepoint",
        ]);

        let config = cli.config();
        assert_eq!(config.pd_addr, "http://pd-0:2379");
        assert_eq!(config.timeout_secs, 5);
        assert!(matches!(config.format, OutputFormat::Table));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Cli::try_parse_from(["pdctl", "--timeout", "0", "service-gc-safepoint"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pdctl", "--pd", "http://127.0.0.1:2379", "service-gc-safepoint"]);

        let config = cli.config();
        assert_eq!(config.timeout_secs, 30);
        assert!(matches!(config.format, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::ServiceGcSafepoint(ref args) if args.command.is_none()));
    }
}
