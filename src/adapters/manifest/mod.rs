//! JSON document manifests
//!
//! A manifest describes the document whose groups are exported: canvas
//! settings, color mode and the layer tree, with pixel content taken from
//! image files or solid fills.

pub mod loader;
pub mod models;

pub use loader::{build_document, load_manifest};
pub use models::{DocumentManifest, LayerManifest};
