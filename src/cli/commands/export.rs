//! Export command implementation
//!
//! This module implements the `export` command, which writes every top-level
//! group of a document into its own layered file.

use crate::adapters::manifest::load_manifest;
use crate::config::load_config_or_default;
use crate::core::export::{validate_output_dir, ExportCoordinator, ExportOptions, GroupStatus};
use crate::domain::GroupSplitError;
use crate::log_error_with_context;
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Document manifest (JSON) to export groups from
    pub manifest: PathBuf,

    /// Destination folder (overrides export.output_dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Trim each exported document to its non-transparent content
    #[arg(long, overrides_with = "no_trim")]
    pub trim: bool,

    /// Keep the source canvas size even if export.trim is set
    #[arg(long, overrides_with = "trim")]
    pub no_trim: bool,

    /// Re-read every written file and record its checksum
    #[arg(long, overrides_with = "no_verify")]
    pub verify: bool,

    /// Skip verification even if verification.enable_verification is set
    #[arg(long, overrides_with = "verify")]
    pub no_verify: bool,

    /// Restore the document's original selection after the run
    #[arg(long, overrides_with = "no_restore_selection")]
    pub restore_selection: bool,

    /// Leave the selection on the last group even if export.restore_selection is set
    #[arg(long, overrides_with = "restore_selection")]
    pub no_restore_selection: bool,

    /// Write the export summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// List the files that would be written without writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply CLI overrides
        if let Some(trim) = flag_override(self.trim, self.no_trim) {
            config.export.trim = trim;
        }
        if let Some(restore) = flag_override(self.restore_selection, self.no_restore_selection) {
            config.export.restore_selection = restore;
        }
        if let Some(verify) = flag_override(self.verify, self.no_verify) {
            config.verification.enable_verification = verify;
        }

        let output_dir = match self
            .output
            .clone()
            .or_else(|| config.export.output_dir.as_ref().map(PathBuf::from))
        {
            Some(dir) => dir,
            None => {
                eprintln!("No output folder given. Use --output or set export.output_dir");
                return Ok(2);
            }
        };

        // Load the source document
        let mut source = match load_manifest(&self.manifest) {
            Ok(source) => source,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load document");
                eprintln!("Failed to load document: {e}");
                return Ok(3); // Document load error exit code
            }
        };

        let options = ExportOptions::new(&output_dir, config.export.trim)
            .with_restore_selection(config.export.restore_selection);

        if self.dry_run {
            // The coordinator checks the folder on a real run
            if let Err(e) = validate_output_dir(&output_dir) {
                tracing::error!(error = %e, "Invalid output folder");
                eprintln!("{e}");
                return Ok(2);
            }

            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
            for (_, group) in source.groups() {
                println!("  {} -> {}", group.name, options.output_path(&group.name).display());
            }
            println!();
            println!("{} group(s) would be exported", source.group_count());
            return Ok(0);
        }

        println!("🚀 Exporting groups of '{}'...", source.name);
        println!();

        let mut coordinator = ExportCoordinator::new(config, options);
        let summary = match coordinator.execute_export(&mut source) {
            Ok(s) => s,
            Err(e @ GroupSplitError::Validation(_)) => {
                tracing::error!(error = %e, "Invalid output folder");
                eprintln!("{e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        for outcome in &summary.outcomes {
            match &outcome.status {
                GroupStatus::Exported {
                    path,
                    width,
                    height,
                    ..
                } => println!("  ✅ {} -> {} ({}x{})", outcome.group_name, path.display(), width, height),
                _ => {
                    if let Some(message) = outcome.failure_message() {
                        println!("  ❌ {message}");
                    }
                }
            }
        }

        // Display summary
        println!();
        println!("📊 Export Summary:");
        println!("  Document: {}", summary.document);
        println!("  Output Folder: {}", summary.output_dir.display());
        println!("  Total Groups: {}", summary.total_groups);
        println!("  Successful: {}", summary.successful_exports);
        println!("  Failed: {}", summary.failed_exports);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Success Rate: {:.2}%", summary.success_rate());
        println!();

        let mut verification_failed = false;
        if let Some(report) = &summary.verification_report {
            print!("{}", report.format_summary());
            println!();
            verification_failed = !report.is_success();
        }

        if let Some(report_path) = &self.report {
            let json = serde_json::to_string_pretty(&summary)?;
            fs::write(report_path, json)?;
            println!("📝 Report written to {}", report_path.display());
            println!();
        }

        // Determine exit code
        let exit_code = if summary.total_groups == 0 {
            println!("ℹ️  Document has no top-level groups, nothing to export");
            0
        } else if summary.is_successful() && !verification_failed {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed with failures");
            1 // Partial success
        };

        Ok(exit_code)
    }
}

/// `--flag` / `--no-flag` pair, `None` when neither was given
fn flag_override(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}
