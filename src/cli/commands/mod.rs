//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod groups;
pub mod init;
pub mod validate;
