// Groupsplit - Layer group export tool
// Copyright (c) 2025 Groupsplit Contributors
// Licensed under the MIT License

use clap::Parser;
use groupsplit::cli::{Cli, Commands};
use groupsplit::config::{load_config_or_default, LoggingConfig};
use groupsplit::logging::init_logging;
use std::process;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // File logging follows the configuration when it loads; otherwise the
    // command itself reports the configuration problem
    let (logging_config, config_level) = match load_config_or_default(&cli.config) {
        Ok(config) => (config.logging, config.application.log_level),
        Err(_) => (LoggingConfig::default(), "info".to_string()),
    };
    let log_level = cli.log_level.as_deref().unwrap_or(&config_level);

    let guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "groupsplit - layer group export"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // The guard flushes file logs on drop, which process::exit would skip
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config),
        Commands::Groups(args) => args.execute(),
        Commands::ValidateConfig(args) => args.execute(&cli.config),
        Commands::Init(args) => args.execute(),
    }
}
