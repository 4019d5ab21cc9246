//! Domain models and types for groupsplit.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Color modes** ([`ColorMode`], [`NewDocumentMode`]) and the [`map_color_mode`] table
//! - **Document model** ([`SourceDocument`], [`LayeredDocument`], [`LayerNode`])
//! - **Error types** ([`GroupSplitError`], [`HostError`])
//! - **Result type alias** ([`Result`])
//!
//! # Layer order
//!
//! Every layer list is stored top-to-bottom: index 0 is the layer a user sees
//! first in the layers panel.
//!
//! ```rust
//! use groupsplit::domain::{map_color_mode, ColorMode, NewDocumentMode};
//!
//! assert_eq!(map_color_mode(ColorMode::Cmyk), NewDocumentMode::Cmyk);
//! assert_eq!(map_color_mode(ColorMode::Indexed), NewDocumentMode::Rgb);
//! ```

pub mod color;
pub mod document;
pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use color::{map_color_mode, ColorMode, NewDocumentMode};
pub use document::{
    DocumentFill, DocumentSettings, LayerGroup, LayerNode, LayeredDocument, NewDocumentSpec,
    PixelLayer, Rect, SourceDocument, SourceDocumentBuilder,
};
pub use errors::{GroupSplitError, HostError};
pub use result::Result;
