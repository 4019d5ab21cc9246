//! Groups command implementation
//!
//! This module implements the `groups` command, which lists the top-level
//! groups of a document and the files an export would produce.

use crate::adapters::manifest::load_manifest;
use crate::domain::{map_color_mode, SourceDocument};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the groups command
#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Document manifest (JSON)
    pub manifest: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

/// One row of the listing
#[derive(Debug, Serialize, PartialEq)]
pub struct GroupEntry {
    pub index: usize,
    pub name: String,
    /// Layers and groups nested anywhere inside the group
    pub layers: usize,
    pub file_name: String,
}

/// List the exportable groups of `source`
pub fn list_groups(source: &SourceDocument) -> Vec<GroupEntry> {
    source
        .groups()
        .map(|(index, group)| GroupEntry {
            index,
            name: group.name.clone(),
            layers: group.descendant_count(),
            file_name: format!("{}.psd", group.name),
        })
        .collect()
}

impl GroupsArgs {
    /// Execute the groups command
    pub fn execute(&self) -> anyhow::Result<i32> {
        let source = match load_manifest(&self.manifest) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Failed to load document: {e}");
                return Ok(3);
            }
        };

        let entries = list_groups(&source);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(0);
        }

        println!("📄 {}", source.name);
        println!(
            "  Canvas: {}x{} @ {} ppi, {}-bit",
            source.settings.width,
            source.settings.height,
            source.settings.resolution,
            source.settings.bits_per_channel
        );
        println!(
            "  Color Mode: {} (exports as {})",
            source.color_mode,
            map_color_mode(source.color_mode)
        );
        println!();

        if entries.is_empty() {
            println!("No top-level groups found");
            return Ok(0);
        }

        println!("Groups:");
        for entry in &entries {
            println!(
                "  [{}] {} ({} layer(s)) -> {}",
                entry.index, entry.name, entry.layers, entry.file_name
            );
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LayerGroup, LayerNode, PixelLayer, SourceDocumentBuilder};
    use image::RgbaImage;

    #[test]
    fn test_list_groups_skips_loose_layers() {
        let source = SourceDocumentBuilder::new("poster", 10, 10)
            .layer(LayerNode::Pixel(PixelLayer::new("loose", 0, 0, RgbaImage::new(1, 1))))
            .layer(LayerNode::Group(LayerGroup::new(
                "Logo",
                vec![
                    LayerNode::Pixel(PixelLayer::new("a", 0, 0, RgbaImage::new(1, 1))),
                    LayerNode::Group(LayerGroup::new("inner", Vec::new())),
                ],
            )))
            .build()
            .unwrap();

        let entries = list_groups(&source);
        assert_eq!(
            entries,
            vec![GroupEntry {
                index: 1,
                name: "Logo".to_string(),
                layers: 2,
                file_name: "Logo.psd".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_manifest_exit_code() {
        let args = GroupsArgs {
            manifest: PathBuf::from("/nonexistent/poster.json"),
            json: false,
        };
        assert_eq!(args.execute().unwrap(), 3);
    }
}
