//! Core business logic for groupsplit.
//!
//! # Modules
//!
//! - [`export`] - Group export pipeline, coordination and summaries
//! - [`verification`] - Read-back verification with checksums
//!
//! # Export Workflow
//!
//! 1. **Load**: Read the source document from its manifest
//! 2. **Export**: For each top-level group, create a target, duplicate, trim, save, close
//! 3. **Verify** (optional): Re-read each written file's header and checksum it
//! 4. **Report**: Generate the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use groupsplit::adapters::manifest::load_manifest;
//! use groupsplit::config::GroupSplitConfig;
//! use groupsplit::core::export::{ExportCoordinator, ExportOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = load_manifest("poster.json")?;
//! let mut coordinator =
//!     ExportCoordinator::new(GroupSplitConfig::default(), ExportOptions::new("out", true));
//!
//! let summary = coordinator.execute_export(&mut source)?;
//!
//! println!("Total: {}", summary.total_groups);
//! println!("Successful: {}", summary.successful_exports);
//! println!("Failed: {}", summary.failed_exports);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod verification;
