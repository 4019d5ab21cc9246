//! Configuration management for groupsplit.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! groupsplit uses an optional TOML configuration file with:
//! - Default values for every setting
//! - Validation on load
//! - Type-safe configuration structs
//!
//! Command-line flags take precedence over values from the file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use groupsplit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("groupsplit.toml")?;
//!
//! println!("Trim: {}", config.export.trim);
//! println!("Verify: {}", config.verification.enable_verification);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ExportConfig`] - Output folder, trim and selection handling
//! - [`VerificationConfig`] - Post-export verification
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! output_dir = "./groups"
//! trim = true
//! restore_selection = false
//!
//! [verification]
//! enable_verification = true
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, parse_config, DEFAULT_CONFIG_FILE};
pub use schema::{
    ApplicationConfig, ExportConfig, GroupSplitConfig, LoggingConfig, VerificationConfig,
};
