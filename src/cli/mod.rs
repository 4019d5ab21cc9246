//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for groupsplit using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// groupsplit - Export each layer group of a document to its own PSD file
#[derive(Parser, Debug)]
#[command(name = "groupsplit")]
#[command(version, about, long_about = None)]
#[command(author = "Groupsplit Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "groupsplit.toml")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every top-level group of a document as a layered file
    Export(commands::export::ExportArgs),

    /// List the top-level groups of a document
    Groups(commands::groups::GroupsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["groupsplit", "export", "poster.json"]);
        assert_eq!(cli.config, "groupsplit.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["groupsplit", "--config", "custom.toml", "export", "a.json"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["groupsplit", "--log-level", "debug", "groups", "a.json"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Groups(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["groupsplit", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["groupsplit", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_export_requires_manifest() {
        assert!(Cli::try_parse_from(["groupsplit", "export"]).is_err());
    }
}
