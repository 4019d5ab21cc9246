//! Domain error types
//!
//! This module defines the error hierarchy for groupsplit.
//! Errors raised by the document host and the layered writer are kept in
//! [`HostError`] so the export pipeline can turn them into per-group outcomes
//! without ever seeing third-party error types.

use thiserror::Error;

/// Main groupsplit error type
///
/// Used for everything outside a single group's processing step: loading
/// configuration, reading the document manifest, verification, reporting.
#[derive(Debug, Error)]
pub enum GroupSplitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document manifest could not be read or is malformed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Layer image could not be decoded
    #[error("Image error: {0}")]
    Image(String),

    /// Document host or layered writer errors
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Verification errors
    #[error("Verification error: {0}")]
    Verification(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised by a [`DocumentHost`](crate::adapters::host::DocumentHost) or
/// [`LayeredWriter`](crate::adapters::host::LayeredWriter)
///
/// The message of each variant is what ends up in a group's failure outcome,
/// so it should read well on its own.
#[derive(Debug, Error)]
pub enum HostError {
    /// Document parameters rejected at creation time
    #[error("Invalid document parameters: {0}")]
    InvalidDocument(String),

    /// Host resource limit reached (open documents, memory)
    #[error("Resource limit reached: {0}")]
    ResourceLimit(String),

    /// No top-level layer at the requested index
    #[error("No top-level layer at index {0}")]
    GroupNotFound(usize),

    /// Top-level layer exists but is not a group
    #[error("Top-level layer '{0}' is not a group")]
    NotAGroup(String),

    /// Layered format encoding failed
    #[error("Encoding failed: {0}")]
    Codec(String),

    /// Underlying filesystem error
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for HostError {
    fn from(err: std::io::Error) -> Self {
        HostError::Io(err.to_string())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for GroupSplitError {
    fn from(err: std::io::Error) -> Self {
        GroupSplitError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GroupSplitError {
    fn from(err: serde_json::Error) -> Self {
        GroupSplitError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GroupSplitError {
    fn from(err: toml::de::Error) -> Self {
        GroupSplitError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<image::ImageError> for GroupSplitError {
    fn from(err: image::ImageError) -> Self {
        GroupSplitError::Image(err.to_string())
    }
}
