//! External system integrations for groupsplit.
//!
//! This module provides adapters between the export pipeline and the outside
//! world:
//!
//! - [`host`] - Document host abstraction (trait-based) and the in-memory [`host::CanvasHost`]
//! - [`psd`] - Layered PSD writer and header reader
//! - [`manifest`] - JSON manifests describing the source document
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external concerns and
//! enable testing with fake implementations. The pipeline only sees the
//! [`host::DocumentHost`] and [`host::LayeredWriter`] traits.
//!
//! ```rust,no_run
//! use groupsplit::adapters::host::CanvasHost;
//! use groupsplit::adapters::manifest::load_manifest;
//! use groupsplit::adapters::psd::PsdWriter;
//! use groupsplit::core::export::pipeline::export_groups;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = load_manifest("poster.json")?;
//! let outcomes = export_groups(
//!     &mut source,
//!     true,
//!     Path::new("out"),
//!     CanvasHost::new(),
//!     PsdWriter::new(),
//! );
//! println!("{} groups processed", outcomes.len());
//! # Ok(())
//! # }
//! ```

pub mod host;
pub mod manifest;
pub mod psd;
