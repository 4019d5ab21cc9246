//! Export coordinator - main orchestrator for the export process
//!
//! This module wires one export run together: it checks the destination,
//! runs the group pipeline against the in-memory host and the PSD writer,
//! optionally verifies the written files, and produces the run summary.

use super::outcome::GroupOutcome;
use super::pipeline::{ExportOptions, ExportPipeline};
use super::summary::ExportSummary;
use crate::adapters::host::CanvasHost;
use crate::adapters::psd::PsdWriter;
use crate::config::GroupSplitConfig;
use crate::core::verification::Verifier;
use crate::domain::{GroupSplitError, Result, SourceDocument};
use crate::log_export_complete;
use std::fs;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

/// Export coordinator
pub struct ExportCoordinator {
    config: GroupSplitConfig,
    pipeline: ExportPipeline<CanvasHost, PsdWriter>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(config: GroupSplitConfig, options: ExportOptions) -> Self {
        Self {
            config,
            pipeline: ExportPipeline::new(CanvasHost::new(), PsdWriter::new(), options),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        self.pipeline.options()
    }

    /// Execute the export
    ///
    /// This is the main entry point for the export process. It:
    /// 1. Validates the output folder
    /// 2. Exports every top-level group of `source`
    /// 3. Verifies the written files, if enabled
    /// 4. Generates the summary report
    ///
    /// # Errors
    ///
    /// Returns an error only if the output folder is unusable. Failures of
    /// individual groups are reported in the summary.
    pub fn execute_export(&mut self, source: &mut SourceDocument) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let output_dir = self.options().output_dir.clone();
        validate_output_dir(&output_dir)?;

        let mut summary = ExportSummary::new(source.name.clone(), output_dir);

        tracing::info!(
            run_id = %summary.run_id,
            document = %source.name,
            groups = source.group_count(),
            trim = self.options().trim,
            "Starting export process"
        );

        let outcomes = self.pipeline.export_groups(source);
        if self.config.verification.enable_verification {
            self.verify(&outcomes, &mut summary);
        }
        summary.record_outcomes(outcomes);

        let summary = summary.with_duration(start_time.elapsed());
        log_export_complete!(summary.successful_exports, summary.duration);
        summary.log_summary();

        Ok(summary)
    }

    fn verify(&self, outcomes: &[GroupOutcome], summary: &mut ExportSummary) {
        tracing::info!("Running post-export verification");
        let report = Verifier::new().verify_outcomes(outcomes);

        if !report.is_success() {
            tracing::warn!(
                failed_count = report.failed,
                "Verification found {} file(s) that do not match their export",
                report.failed
            );
        }

        summary.set_verification_report(report);
    }
}

/// Check that `dir` is an existing folder new files can be written to
///
/// # Errors
///
/// Returns [`GroupSplitError::Validation`] if the path is empty, missing, not
/// a directory, or not writable.
pub fn validate_output_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(GroupSplitError::Validation(
            "Output folder must not be empty".to_string(),
        ));
    }

    let metadata = fs::metadata(dir).map_err(|e| {
        GroupSplitError::Validation(format!(
            "Output folder {} is not accessible: {}",
            dir.display(),
            e
        ))
    })?;
    if !metadata.is_dir() {
        return Err(GroupSplitError::Validation(format!(
            "Output folder {} is not a directory",
            dir.display()
        )));
    }

    let probe = dir.join(format!(".groupsplit-{}", Uuid::new_v4()));
    fs::write(&probe, b"").map_err(|e| {
        GroupSplitError::Validation(format!(
            "Output folder {} is not writable: {}",
            dir.display(),
            e
        ))
    })?;
    if let Err(e) = fs::remove_file(&probe) {
        tracing::warn!(path = %probe.display(), error = %e, "Failed to remove write probe");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LayerGroup, LayerNode, PixelLayer, SourceDocumentBuilder};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn source() -> SourceDocument {
        SourceDocumentBuilder::new("poster", 64, 48)
            .layer(LayerNode::Group(LayerGroup::new(
                "Logo",
                vec![LayerNode::Pixel(PixelLayer::new(
                    "mark",
                    8,
                    4,
                    RgbaImage::from_pixel(10, 6, Rgba([200, 10, 10, 255])),
                ))],
            )))
            .build()
            .unwrap()
    }

    #[test]
    fn test_execute_export_with_verification() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = GroupSplitConfig::default();
        config.verification.enable_verification = true;
        let mut coordinator =
            ExportCoordinator::new(config, ExportOptions::new(temp_dir.path(), true));

        let mut source = source();
        let summary = coordinator.execute_export(&mut source).unwrap();

        assert!(summary.is_successful());
        assert_eq!(summary.total_groups, 1);
        assert!(temp_dir.path().join("Logo.psd").exists());

        let report = summary.verification_report.unwrap();
        assert_eq!(report.passed, 1);
    }

    #[test]
    fn test_probe_file_is_removed() {
        let temp_dir = TempDir::new().unwrap();
        validate_output_dir(temp_dir.path()).unwrap();
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_output_dir(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(GroupSplitError::Validation(_))));
    }

    #[test]
    fn test_file_as_output_dir_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(validate_output_dir(&file).is_err());
    }

    #[test]
    fn test_empty_output_dir_is_rejected() {
        assert!(validate_output_dir(Path::new("")).is_err());
    }
}
