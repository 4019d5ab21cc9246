//! Document host integration
//!
//! - [`traits`] - The [`DocumentHost`] and [`LayeredWriter`] seams used by the pipeline
//! - [`canvas`] - [`CanvasHost`], the in-memory host implementation

pub mod canvas;
pub mod traits;

pub use canvas::CanvasHost;
pub use traits::{DocumentHost, LayeredWriter};
