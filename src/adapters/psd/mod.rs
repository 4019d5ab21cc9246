//! Layered PSD output
//!
//! - [`writer`] - [`PsdWriter`], the [`LayeredWriter`](crate::adapters::host::LayeredWriter) for `.psd` files
//! - [`channels`] - Per-mode channel encoding
//! - [`header`] - Header readback used by verification

pub mod channels;
pub mod header;
pub mod writer;

pub use header::{read_header, PsdHeader};
pub use writer::PsdWriter;
