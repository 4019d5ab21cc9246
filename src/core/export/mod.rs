//! Export orchestration
//!
//! This module provides the core export logic for groupsplit, including:
//! - The per-group export pipeline
//! - Per-group outcomes
//! - Export coordination and orchestration
//! - Summary and reporting

pub mod coordinator;
pub mod outcome;
pub mod pipeline;
pub mod summary;

pub use coordinator::{validate_output_dir, ExportCoordinator};
pub use outcome::{GroupOutcome, GroupStatus};
pub use pipeline::{export_groups, ExportOptions, ExportPipeline};
pub use summary::{ExportError, ExportErrorType, ExportSummary};
