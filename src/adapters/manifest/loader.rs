//! Manifest loading
//!
//! Turns a JSON manifest into a [`SourceDocument`], decoding every image
//! layer it references.

use super::models::{DocumentManifest, LayerManifest};
use crate::domain::errors::GroupSplitError;
use crate::domain::result::Result;
use crate::domain::{LayerGroup, LayerNode, PixelLayer, SourceDocument, SourceDocumentBuilder};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;

/// Loads a source document from a JSON manifest
///
/// Image paths inside the manifest are resolved relative to the manifest's
/// own directory.
///
/// # Errors
///
/// Returns an error if:
/// - The manifest cannot be read or is not valid JSON
/// - A referenced image cannot be opened or decoded
/// - The document settings are invalid
///
/// # Examples
///
/// ```no_run
/// use groupsplit::adapters::manifest::load_manifest;
///
/// let document = load_manifest("poster.json").expect("Failed to load manifest");
/// println!("{} groups", document.group_count());
/// ```
pub fn load_manifest(path: impl AsRef<Path>) -> Result<SourceDocument> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|e| {
        GroupSplitError::Manifest(format!(
            "Failed to read manifest {}: {}",
            path.display(),
            e
        ))
    })?;

    let manifest: DocumentManifest = serde_json::from_str(&contents).map_err(|e| {
        GroupSplitError::Manifest(format!("Failed to parse manifest {}: {}", path.display(), e))
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let default_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string());

    let document = build_document(manifest, base_dir, default_name)?;

    tracing::info!(
        manifest = %path.display(),
        document = %document.name,
        width = document.settings.width,
        height = document.settings.height,
        color_mode = %document.color_mode,
        groups = document.group_count(),
        "Loaded source document"
    );

    Ok(document)
}

/// Builds a source document from an already parsed manifest
pub fn build_document(
    manifest: DocumentManifest,
    base_dir: &Path,
    default_name: String,
) -> Result<SourceDocument> {
    let layers = manifest
        .layers
        .into_iter()
        .map(|layer| build_layer(layer, base_dir))
        .collect::<Result<Vec<_>>>()?;

    let mut document = SourceDocumentBuilder::new(
        manifest.name.unwrap_or(default_name),
        manifest.width,
        manifest.height,
    )
    .resolution(manifest.resolution)
    .pixel_aspect_ratio(manifest.pixel_aspect_ratio)
    .bits_per_channel(manifest.bits_per_channel)
    .color_mode(manifest.color_mode)
    .layers(layers)
    .build()?;

    if let Some(index) = manifest.active_layer {
        if index >= document.layers.len() {
            return Err(GroupSplitError::Manifest(format!(
                "active_layer {} is out of range, document has {} top-level layers",
                index,
                document.layers.len()
            )));
        }
        document.select_layer(index);
    }

    Ok(document)
}

fn build_layer(layer: LayerManifest, base_dir: &Path) -> Result<LayerNode> {
    match layer {
        LayerManifest::Group {
            name,
            visible,
            opacity,
            layers,
        } => {
            let children = layers
                .into_iter()
                .map(|child| build_layer(child, base_dir))
                .collect::<Result<Vec<_>>>()?;
            let mut group = LayerGroup::new(name, children);
            group.visible = visible;
            group.opacity = opacity;
            Ok(LayerNode::Group(group))
        }
        LayerManifest::Image {
            name,
            path,
            left,
            top,
            visible,
            opacity,
        } => {
            let full_path = base_dir.join(&path);
            let pixels = image::open(&full_path)
                .map_err(|e| {
                    GroupSplitError::Image(format!(
                        "Failed to open image {} for layer '{}': {}",
                        full_path.display(),
                        name,
                        e
                    ))
                })?
                .to_rgba8();

            tracing::debug!(
                layer = %name,
                path = %full_path.display(),
                width = pixels.width(),
                height = pixels.height(),
                "Decoded image layer"
            );

            let mut layer = PixelLayer::new(name, left, top, pixels);
            layer.visible = visible;
            layer.opacity = opacity;
            Ok(LayerNode::Pixel(layer))
        }
        LayerManifest::Fill {
            name,
            color,
            left,
            top,
            width,
            height,
            visible,
            opacity,
        } => {
            let mut layer =
                PixelLayer::new(name, left, top, RgbaImage::from_pixel(width, height, Rgba(color)));
            layer.visible = visible;
            layer.opacity = opacity;
            Ok(LayerNode::Pixel(layer))
        }
    }
}
