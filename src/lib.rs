// Groupsplit - Layer group export tool
// Copyright (c) 2025 Groupsplit Contributors
// Licensed under the MIT License

//! # groupsplit - Layer group export
//!
//! groupsplit takes a layered document and writes each of its top-level layer
//! groups into a separate layered PSD file, named after the group.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Loading** a source document from a JSON manifest with image and fill layers
//! - **Exporting** each top-level group into a new document with the source's canvas,
//!   resolution, pixel aspect ratio, bit depth and mapped color mode
//! - **Trimming** exported documents to their non-transparent content
//! - **Writing** layered PSD files with groups kept as folders
//! - **Verifying** written files by reading their headers back
//!
//! ## Architecture
//!
//! groupsplit follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export pipeline, coordination, verification)
//! - [`adapters`] - Document host, PSD codec and manifest loading
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use groupsplit::adapters::manifest::load_manifest;
//! use groupsplit::config::load_config_or_default;
//! use groupsplit::core::export::{ExportCoordinator, ExportOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("groupsplit.toml")?;
//!     let mut source = load_manifest("poster.json")?;
//!
//!     let options = ExportOptions::new("./groups", config.export.trim);
//!     let mut coordinator = ExportCoordinator::new(config, options);
//!     let summary = coordinator.execute_export(&mut source)?;
//!
//!     println!("Exported {} of {} groups", summary.successful_exports, summary.total_groups);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure isolation
//!
//! A group that cannot be created, filled, trimmed or saved is reported in its
//! [`core::export::GroupOutcome`] and the run moves on to the next group:
//!
//! ```rust,no_run
//! use groupsplit::adapters::host::CanvasHost;
//! use groupsplit::adapters::psd::PsdWriter;
//! use groupsplit::core::export::export_groups;
//! # use groupsplit::domain::SourceDocument;
//! # use std::path::Path;
//!
//! # fn example(source: &mut SourceDocument) {
//! let outcomes = export_groups(source, false, Path::new("out"), CanvasHost::new(), PsdWriter::new());
//! for outcome in &outcomes {
//!     if let Some(message) = outcome.failure_message() {
//!         eprintln!("{message}");
//!     }
//! }
//! # }
//! ```
//!
//! ## Error Handling
//!
//! groupsplit uses the [`domain::GroupSplitError`] type for run-level errors
//! and [`domain::HostError`] for errors of individual host operations.
//!
//! ## Logging
//!
//! groupsplit uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(group = "Logo", "Exporting group");
//! warn!(group = "Logo", stage = "save", "Group export failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
