//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use super::outcome::{GroupOutcome, GroupStatus};
use crate::core::verification::report::VerificationReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Summary of an export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Name of the source document
    pub document: String,

    pub output_dir: PathBuf,

    pub started_at: DateTime<Utc>,

    /// Duration of the export
    #[serde(with = "duration_millis")]
    pub duration: Duration,

    /// Total number of top-level groups
    pub total_groups: usize,

    /// Number of groups written to disk
    pub successful_exports: usize,

    /// Number of groups that failed at any step
    pub failed_exports: usize,

    /// One outcome per group, in stack order
    pub outcomes: Vec<GroupOutcome>,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,

    /// Verification report (if verification was run)
    pub verification_report: Option<VerificationReport>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(document: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            document: document.into(),
            output_dir: output_dir.into(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            total_groups: 0,
            successful_exports: 0,
            failed_exports: 0,
            outcomes: Vec::new(),
            errors: Vec::new(),
            verification_report: None,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record the pipeline's outcomes and derive totals and errors from them
    pub fn record_outcomes(&mut self, outcomes: Vec<GroupOutcome>) {
        for outcome in &outcomes {
            self.total_groups += 1;
            if outcome.is_exported() {
                self.successful_exports += 1;
            } else {
                self.failed_exports += 1;
                if let Some(error) = ExportError::from_outcome(outcome) {
                    self.errors.push(error);
                }
            }
        }
        self.outcomes.extend(outcomes);
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Set the verification report
    pub fn set_verification_report(&mut self, report: VerificationReport) {
        self.verification_report = Some(report);
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.failed_exports == 0 && self.errors.is_empty()
    }

    /// Paths of every written file
    pub fn exported_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes.iter().filter_map(GroupOutcome::exported_path)
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_groups == 0 {
            return 100.0;
        }
        (self.successful_exports as f64 / self.total_groups as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            document = %self.document,
            output_dir = %self.output_dir.display(),
            total_groups = self.total_groups,
            successful = self.successful_exports,
            failed = self.failed_exports,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    group = error.group.as_deref().unwrap_or("-"),
                    message = %error.message,
                    "Export error"
                );
            }
        }
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportErrorType {
    /// Target document could not be created
    Create,
    /// Group content could not be duplicated or trimmed
    Content,
    /// Target could not be written
    Save,
    /// Post-export verification could not run
    Verification,
}

/// Export error with context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Name of the group the error belongs to
    pub group: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            group: None,
        }
    }

    /// Attach the group the error belongs to
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Error for a failed outcome, `None` for an exported one
    pub fn from_outcome(outcome: &GroupOutcome) -> Option<Self> {
        let error_type = match outcome.status {
            GroupStatus::Exported { .. } => return None,
            GroupStatus::CreateFailed { .. } => ExportErrorType::Create,
            GroupStatus::ContentFailed { .. } => ExportErrorType::Content,
            GroupStatus::SaveFailed { .. } => ExportErrorType::Save,
        };
        let message = outcome.failure_message()?;
        Some(Self::new(error_type, message).with_group(outcome.group_name.clone()))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
