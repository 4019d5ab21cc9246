//! Checksum calculation for output verification
//!
//! Written files are fingerprinted with SHA-256 so a report can tell whether
//! two runs produced identical output.

use crate::domain::{GroupSplitError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Calculate SHA-256 checksum of raw bytes
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use groupsplit::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"8BPS");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Calculate SHA-256 checksum of a file, reading it in chunks
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn calculate_file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| {
        GroupSplitError::Verification(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer).map_err(|e| {
            GroupSplitError::Verification(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
