//! Verification report structures
//!
//! This module defines the structures for reporting verification results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verification report containing results of post-export validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// Total number of groups looked at
    pub total_verified: usize,

    /// Number of files that passed verification
    pub passed: usize,

    /// Number of files that failed verification
    pub failed: usize,

    /// Number of groups skipped because nothing was written for them
    pub skipped: usize,

    /// Files that passed, with their checksums
    pub files: Vec<VerifiedFile>,

    /// List of failed verifications with details
    pub failures: Vec<VerificationFailure>,

    /// Duration of verification in milliseconds
    pub duration_ms: u64,
}

/// A written file that matched its expected header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedFile {
    pub group_name: String,
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the file
    pub checksum: String,
}

/// Details of a failed verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub group_name: String,

    pub path: PathBuf,

    /// Reason for failure
    pub reason: String,
}

impl VerificationReport {
    /// Create a new verification report
    pub fn new() -> Self {
        Self {
            verified_at: Utc::now(),
            total_verified: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            files: Vec::new(),
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Record a successful verification
    pub fn record_pass(&mut self, file: VerifiedFile) {
        self.total_verified += 1;
        self.passed += 1;
        self.files.push(file);
    }

    /// Record a failed verification
    pub fn record_failure(&mut self, failure: VerificationFailure) {
        self.total_verified += 1;
        self.failed += 1;
        self.failures.push(failure);
    }

    /// Record a skipped verification
    pub fn record_skip(&mut self) {
        self.total_verified += 1;
        self.skipped += 1;
    }

    /// Set the duration of verification
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Check if all verifications passed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get the success rate as a percentage of checked files
    pub fn success_rate(&self) -> f64 {
        let checked = self.passed + self.failed;
        if checked == 0 {
            return 100.0;
        }
        (self.passed as f64 / checked as f64) * 100.0
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("📊 Verification Report\n");
        summary.push_str(&format!("  Verified at: {}\n", self.verified_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  ✅ Passed: {}\n", self.passed));
        summary.push_str(&format!("  ❌ Failed: {}\n", self.failed));
        summary.push_str(&format!("  ⏭️  Skipped: {}\n", self.skipped));
        summary.push_str(&format!("  Success rate: {:.2}%\n", self.success_rate()));

        if !self.failures.is_empty() {
            summary.push_str("\n❌ Failures:\n");
            for (i, failure) in self.failures.iter().enumerate() {
                summary.push_str(&format!("  {}. Group: {}\n", i + 1, failure.group_name));
                summary.push_str(&format!("     File: {}\n", failure.path.display()));
                summary.push_str(&format!("     Reason: {}\n", failure.reason));
            }
        }

        summary
    }
}

impl Default for VerificationReport {
    fn default() -> Self {
        Self::new()
    }
}
