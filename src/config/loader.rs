//! Configuration loader with TOML parsing and validation

use super::schema::GroupSplitConfig;
use crate::domain::errors::GroupSplitError;
use crate::domain::result::Result;
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "groupsplit.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Parses the TOML into GroupSplitConfig
/// 3. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use groupsplit::config::loader::load_config;
///
/// let config = load_config("groupsplit.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GroupSplitConfig> {
    let path = path.as_ref();

    // Check if file exists
    if !path.exists() {
        return Err(GroupSplitError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    // Read file contents
    let contents = fs::read_to_string(path).map_err(|e| {
        GroupSplitError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration, falling back to defaults when `path` is the default
/// file name and that file does not exist
///
/// An explicitly named configuration file that is missing is still an error.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read, parsed or validated.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<GroupSplitConfig> {
    let path = path.as_ref();

    if !path.exists() && path == Path::new(DEFAULT_CONFIG_FILE) {
        tracing::debug!(
            path = %path.display(),
            "No configuration file found, using defaults"
        );
        return Ok(GroupSplitConfig::default());
    }

    load_config(path)
}

/// Parses and validates configuration from a TOML string
///
/// # Errors
///
/// Returns an error if parsing or validation fails.
pub fn parse_config(contents: &str) -> Result<GroupSplitConfig> {
    let config: GroupSplitConfig = toml::from_str(contents)
        .map_err(|e| GroupSplitError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    config.validate().map_err(|e| {
        GroupSplitError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}
