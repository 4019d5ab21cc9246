//! Verification logic for post-export validation
//!
//! Every exported file is read back from disk: its PSD header must agree
//! with what the pipeline reported for the group, and it must contain at
//! least one layer record.

use crate::adapters::psd::{read_header, PsdHeader};
use crate::core::export::outcome::{GroupOutcome, GroupStatus};
use crate::core::verification::checksum::calculate_file_checksum;
use crate::core::verification::report::{VerificationFailure, VerificationReport, VerifiedFile};
use crate::domain::NewDocumentMode;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Verifier for post-export validation
#[derive(Debug, Default)]
pub struct Verifier;

impl Verifier {
    pub fn new() -> Self {
        Self
    }

    /// Verify the files written for `outcomes`
    ///
    /// Groups that were not exported are counted as skipped, and so are
    /// groups whose file was replaced by a later group with the same name.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use groupsplit::core::verification::Verifier;
    ///
    /// let report = Verifier::new().verify_outcomes(&[]);
    /// println!("{}", report.format_summary());
    /// ```
    pub fn verify_outcomes(&self, outcomes: &[GroupOutcome]) -> VerificationReport {
        let start = Instant::now();
        let mut report = VerificationReport::new();

        tracing::info!(groups = outcomes.len(), "Starting post-export verification");

        for (position, outcome) in outcomes.iter().enumerate() {
            let GroupStatus::Exported {
                path,
                width,
                height,
                mode,
                bits_per_channel,
            } = &outcome.status
            else {
                report.record_skip();
                continue;
            };

            if overwritten_later(path, &outcomes[position + 1..]) {
                tracing::debug!(
                    group = %outcome.group_name,
                    path = %path.display(),
                    "File replaced by a later group, skipping"
                );
                report.record_skip();
                continue;
            }

            let expected = Expected {
                width: *width,
                height: *height,
                mode: *mode,
                bits_per_channel: *bits_per_channel,
            };

            match verify_file(path, &expected) {
                Ok(checksum) => report.record_pass(VerifiedFile {
                    group_name: outcome.group_name.clone(),
                    path: path.clone(),
                    checksum,
                }),
                Err(reason) => {
                    tracing::warn!(
                        group = %outcome.group_name,
                        path = %path.display(),
                        reason = %reason,
                        "Verification failure"
                    );
                    report.record_failure(VerificationFailure {
                        group_name: outcome.group_name.clone(),
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        report.set_duration(start.elapsed().as_millis() as u64);

        tracing::info!(
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            "Verification completed"
        );

        report
    }
}

/// Last writer wins: a later export to the same path owns the file
fn overwritten_later(path: &Path, later: &[GroupOutcome]) -> bool {
    later
        .iter()
        .any(|outcome| outcome.exported_path().map(PathBuf::as_path) == Some(path))
}

struct Expected {
    width: u32,
    height: u32,
    mode: NewDocumentMode,
    bits_per_channel: u8,
}

fn verify_file(path: &Path, expected: &Expected) -> Result<String, String> {
    let header = read_header(path).map_err(|e| format!("Unreadable file: {e}"))?;
    check_header(&header, expected)?;
    calculate_file_checksum(path).map_err(|e| e.to_string())
}

fn check_header(header: &PsdHeader, expected: &Expected) -> Result<(), String> {
    if (header.width, header.height) != (expected.width, expected.height) {
        return Err(format!(
            "Size {}x{} does not match expected {}x{}",
            header.width, header.height, expected.width, expected.height
        ));
    }
    if header.depth != u16::from(expected.bits_per_channel) {
        return Err(format!(
            "Depth {} does not match expected {}",
            header.depth, expected.bits_per_channel
        ));
    }
    if header.mode != expected.mode.psd_mode() {
        return Err(format!(
            "Color mode {} does not match expected {} ({})",
            header.mode,
            expected.mode.psd_mode(),
            expected.mode
        ));
    }
    if header.layer_count == 0 {
        return Err("File contains no layers".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::psd::PsdWriter;
    use crate::domain::{DocumentSettings, LayerGroup, LayerNode, LayeredDocument, PixelLayer};
    use image::RgbaImage;
    use std::fs;
    use tempfile::TempDir;

    fn write_document(dir: &TempDir, name: &str) -> PathBuf {
        let document = LayeredDocument {
            name: name.to_string(),
            settings: DocumentSettings {
                width: 30,
                height: 20,
                ..DocumentSettings::default()
            },
            mode: NewDocumentMode::Rgb,
            layers: vec![LayerNode::Group(LayerGroup::new(
                name,
                vec![LayerNode::Pixel(PixelLayer::new("px", 0, 0, RgbaImage::new(30, 20)))],
            ))],
        };
        let path = dir.path().join(format!("{name}.psd"));
        fs::write(&path, PsdWriter::new().encode(&document).unwrap()).unwrap();
        path
    }

    fn exported(name: &str, path: PathBuf, width: u32) -> GroupOutcome {
        GroupOutcome {
            index: 0,
            group_name: name.to_string(),
            status: GroupStatus::Exported {
                path,
                width,
                height: 20,
                mode: NewDocumentMode::Rgb,
                bits_per_channel: 8,
            },
        }
    }

    #[test]
    fn test_matching_file_passes() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_document(&temp_dir, "Logo");

        let report = Verifier::new().verify_outcomes(&[exported("Logo", path, 30)]);

        assert_eq!(report.passed, 1);
        assert!(report.is_success());
        assert_eq!(report.files[0].checksum.len(), 64);
    }

    #[test]
    fn test_size_mismatch_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_document(&temp_dir, "Logo");

        let report = Verifier::new().verify_outcomes(&[exported("Logo", path, 31)]);

        assert_eq!(report.failed, 1);
        assert!(report.failures[0].reason.contains("Size"));
    }

    #[test]
    fn test_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let report = Verifier::new()
            .verify_outcomes(&[exported("Logo", temp_dir.path().join("Logo.psd"), 30)]);
        assert_eq!(report.failed, 1);
        assert!(report.failures[0].reason.contains("Unreadable"));
    }

    #[test]
    fn test_file_replaced_by_same_named_group_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_document(&temp_dir, "Logo");

        // The first "Logo" claimed 12 pixels wide; the second one wrote the file
        let report = Verifier::new().verify_outcomes(&[
            exported("Logo", path.clone(), 12),
            exported("Logo", path, 30),
        ]);

        assert!(report.is_success());
        assert_eq!(report.passed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_failed_groups_are_skipped() {
        let outcome = GroupOutcome {
            index: 1,
            group_name: "Background".to_string(),
            status: GroupStatus::CreateFailed {
                message: "limit".to_string(),
            },
        };
        let report = Verifier::new().verify_outcomes(&[outcome]);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.passed + report.failed, 0);
    }
}
