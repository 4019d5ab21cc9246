//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "groupsplit.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing groupsplit configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: groupsplit validate-config");
                println!("  3. List groups: groupsplit groups poster.json");
                println!("  4. Run export: groupsplit export poster.json --output ./groups");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# groupsplit configuration

[application]
log_level = "info"

[export]
trim = false

[verification]
enable_verification = false

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# groupsplit configuration
#
# Every setting is optional. Command-line flags take precedence.

[application]
# trace | debug | info | warn | error
log_level = "info"

[export]
# Folder the <group name>.psd files are written to.
# Must exist and be writable. --output overrides it.
output_dir = "./groups"

# Crop each exported document to the bounding box of its
# non-transparent pixels (--trim)
trim = false

# Leave the document's selection where it was before the run.
# By default the last exported group stays selected.
restore_selection = false

[verification]
# Re-read every written file, check its header and record a
# SHA-256 checksum (--verify)
enable_verification = false

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"
# daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "groupsplit.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "groupsplit.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_are_valid() {
        assert!(parse_config(&InitArgs::generate_minimal_config()).is_ok());

        let config = parse_config(&InitArgs::generate_config_with_examples()).unwrap();
        assert_eq!(config.export.output_dir.as_deref(), Some("./groups"));
    }

    #[test]
    fn test_existing_file_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("groupsplit.toml");
        fs::write(&path, "# mine").unwrap();

        let mut args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");

        args.force = true;
        assert_eq!(args.execute().unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[export]"));
    }
}
