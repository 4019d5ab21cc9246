//! Per-group export outcomes

use crate::domain::NewDocumentMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of exporting one top-level group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    /// Index of the group in the source's top-level layer list
    pub index: usize,

    pub group_name: String,

    pub status: GroupStatus,
}

/// What happened to a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupStatus {
    /// The group was saved to `path`
    Exported {
        path: PathBuf,
        /// Canvas size after the optional trim
        width: u32,
        height: u32,
        mode: NewDocumentMode,
        bits_per_channel: u8,
    },
    /// The target document could not be created
    CreateFailed { message: String },
    /// Duplicating or trimming the group's content failed
    ContentFailed { message: String },
    /// The target could not be written to `path`
    SaveFailed { path: PathBuf, message: String },
}

impl GroupOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self.status, GroupStatus::Exported { .. })
    }

    /// Path of the written file, if the group was exported
    pub fn exported_path(&self) -> Option<&PathBuf> {
        match &self.status {
            GroupStatus::Exported { path, .. } => Some(path),
            _ => None,
        }
    }

    /// User-facing failure message, `None` when the group was exported
    pub fn failure_message(&self) -> Option<String> {
        match &self.status {
            GroupStatus::Exported { .. } => None,
            GroupStatus::CreateFailed { message } => Some(format!(
                "Failed to create document for group '{}': {}",
                self.group_name, message
            )),
            GroupStatus::ContentFailed { message } => Some(format!(
                "Failed to copy content of group '{}': {}",
                self.group_name, message
            )),
            GroupStatus::SaveFailed { path, message } => Some(format!(
                "Failed to save group '{}' to {}: {}",
                self.group_name,
                path.display(),
                message
            )),
        }
    }
}
