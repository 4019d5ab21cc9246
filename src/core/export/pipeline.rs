//! Group export pipeline
//!
//! For every top-level group of the source document, in stack order:
//!
//! 1. Select the group in the source document
//! 2. Create a transparent target mirroring the source canvas, in the mapped color mode
//! 3. Duplicate the group into the target
//! 4. Optionally trim the target to its non-transparent content
//! 5. Save the target as `<output_dir>/<group name>.psd`
//! 6. Close the target
//!
//! A failing group never stops the run. Each group yields exactly one
//! [`GroupOutcome`], and a created target is always closed before the next
//! group starts.

use super::outcome::{GroupOutcome, GroupStatus};
use crate::adapters::host::{DocumentHost, LayeredWriter};
use crate::domain::{
    map_color_mode, LayeredDocument, NewDocumentMode, NewDocumentSpec, SourceDocument,
};
use crate::{log_group_failure, log_group_start};
use std::path::{Path, PathBuf};

/// Extension of every written file
pub const OUTPUT_EXTENSION: &str = "psd";

/// Options for one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Trim each target to its non-transparent content before saving
    pub trim: bool,

    /// Existing, writable destination folder
    pub output_dir: PathBuf,

    /// Restore the source's original selection once all groups are done
    pub restore_selection: bool,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>, trim: bool) -> Self {
        Self {
            trim,
            output_dir: output_dir.into(),
            restore_selection: false,
        }
    }

    pub fn with_restore_selection(mut self, restore: bool) -> Self {
        self.restore_selection = restore;
        self
    }

    /// Destination of the file for a group named `group_name`
    pub fn output_path(&self, group_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", group_name, OUTPUT_EXTENSION))
    }
}

/// Runs the per-group export against a host and a writer
pub struct ExportPipeline<H, W> {
    host: H,
    writer: W,
    options: ExportOptions,
}

impl<H: DocumentHost, W: LayeredWriter> ExportPipeline<H, W> {
    pub fn new(host: H, writer: W, options: ExportOptions) -> Self {
        Self {
            host,
            writer,
            options,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_parts(self) -> (H, W) {
        (self.host, self.writer)
    }

    /// Export every top-level group of `source`
    ///
    /// Returns one outcome per group, in the groups' stack order. The only
    /// change made to `source` is its active selection, which is left on the
    /// last processed group unless `restore_selection` is set.
    pub fn export_groups(&mut self, source: &mut SourceDocument) -> Vec<GroupOutcome> {
        let original_selection = source.active_layer;
        let groups: Vec<(usize, String)> = source
            .groups()
            .map(|(index, group)| (index, group.name.clone()))
            .collect();
        let total = groups.len();
        let mode = map_color_mode(source.color_mode);

        if total == 0 {
            tracing::info!(document = %source.name, "Document has no top-level groups");
        } else if source.color_mode.creatable().is_none() {
            tracing::info!(
                source_mode = %source.color_mode,
                target_mode = %mode,
                "Source color mode cannot be used for new documents, falling back"
            );
        }

        let mut outcomes = Vec::with_capacity(total);
        for (position, (index, group_name)) in groups.into_iter().enumerate() {
            log_group_start!(position + 1, total, group_name);

            source.select_layer(index);
            let status = self.export_group(source, index, &group_name, mode);

            if let GroupStatus::Exported { path, .. } = &status {
                tracing::info!(group = %group_name, path = %path.display(), "Group exported");
            }
            outcomes.push(GroupOutcome {
                index,
                group_name,
                status,
            });
        }

        if self.options.restore_selection {
            source.active_layer = original_selection;
        }

        outcomes
    }

    fn export_group(
        &mut self,
        source: &SourceDocument,
        index: usize,
        group_name: &str,
        mode: NewDocumentMode,
    ) -> GroupStatus {
        let spec = NewDocumentSpec::mirroring(source, group_name, mode);
        let mut target = match self.host.create_document(&spec) {
            Ok(target) => target,
            Err(e) => {
                log_group_failure!(group_name, "create", e);
                return GroupStatus::CreateFailed {
                    message: e.to_string(),
                };
            }
        };

        let status = self.fill_and_save(source, index, group_name, &mut target);
        self.host.close_document(target);
        status
    }

    fn fill_and_save(
        &mut self,
        source: &SourceDocument,
        index: usize,
        group_name: &str,
        target: &mut LayeredDocument,
    ) -> GroupStatus {
        if let Err(e) = self.host.duplicate_group(source, index, target) {
            log_group_failure!(group_name, "duplicate", e);
            return GroupStatus::ContentFailed {
                message: e.to_string(),
            };
        }

        if self.options.trim {
            if let Err(e) = self.host.trim_transparent(target) {
                log_group_failure!(group_name, "trim", e);
                return GroupStatus::ContentFailed {
                    message: e.to_string(),
                };
            }
        }

        let path = self.options.output_path(group_name);
        match self.writer.write_layered(target, &path) {
            Ok(()) => GroupStatus::Exported {
                path,
                width: target.width(),
                height: target.height(),
                mode: target.mode,
                bits_per_channel: target.settings.bits_per_channel,
            },
            Err(e) => {
                log_group_failure!(group_name, "save", e);
                GroupStatus::SaveFailed {
                    path,
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Export every top-level group of `source` into `output_dir`
///
/// Convenience wrapper around [`ExportPipeline`] with the selection left on
/// the last processed group.
pub fn export_groups<H: DocumentHost, W: LayeredWriter>(
    source: &mut SourceDocument,
    trim_enabled: bool,
    output_dir: &Path,
    host: H,
    writer: W,
) -> Vec<GroupOutcome> {
    ExportPipeline::new(host, writer, ExportOptions::new(output_dir, trim_enabled))
        .export_groups(source)
}
