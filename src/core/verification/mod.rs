//! Output verification for post-export validation
//!
//! This module re-reads exported files, checks their headers against the
//! pipeline's outcomes and records a checksum for each.

pub mod checksum;
pub mod report;
pub mod verify;

pub use report::{VerificationFailure, VerificationReport, VerifiedFile};
pub use verify::Verifier;
