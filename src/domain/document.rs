//! Layered document model
//!
//! [`SourceDocument`] is the document being split; [`LayeredDocument`] is a
//! document created by the host to receive one group. Both hold their layers
//! top-to-bottom, the same order a layers panel shows them.

use super::color::{ColorMode, NewDocumentMode};
use super::errors::GroupSplitError;
use super::result::Result;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Bit depths a document can be created with
pub const SUPPORTED_BIT_DEPTHS: [u8; 4] = [1, 8, 16, 32];

/// A rectangle in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: i64, top: i64, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.left + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.top + i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Overlap of two rectangles, `None` when they do not touch
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

/// A raster layer
#[derive(Debug, Clone, PartialEq)]
pub struct PixelLayer {
    pub name: String,
    /// Offset of the buffer's top-left pixel on the canvas, may be negative
    pub left: i64,
    pub top: i64,
    /// 0 = fully transparent, 255 = opaque
    pub opacity: u8,
    pub visible: bool,
    pub pixels: RgbaImage,
}

impl PixelLayer {
    pub fn new(name: impl Into<String>, left: i64, top: i64, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            left,
            top,
            opacity: 255,
            visible: true,
            pixels,
        }
    }

    /// Area covered by the layer buffer
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.pixels.width(), self.pixels.height())
    }
}

/// A named collection of layers
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    pub name: String,
    pub opacity: u8,
    pub visible: bool,
    /// Children, top-to-bottom
    pub layers: Vec<LayerNode>,
}

impl LayerGroup {
    pub fn new(name: impl Into<String>, layers: Vec<LayerNode>) -> Self {
        Self {
            name: name.into(),
            opacity: 255,
            visible: true,
            layers,
        }
    }

    /// Number of layers below this group, nested groups included
    pub fn descendant_count(&self) -> usize {
        self.layers
            .iter()
            .map(|node| match node {
                LayerNode::Pixel(_) => 1,
                LayerNode::Group(group) => 1 + group.descendant_count(),
            })
            .sum()
    }
}

/// One entry of a layer stack
#[derive(Debug, Clone, PartialEq)]
pub enum LayerNode {
    Pixel(PixelLayer),
    Group(LayerGroup),
}

impl LayerNode {
    pub fn name(&self) -> &str {
        match self {
            LayerNode::Pixel(layer) => &layer.name,
            LayerNode::Group(group) => &group.name,
        }
    }

    pub fn as_group(&self) -> Option<&LayerGroup> {
        match self {
            LayerNode::Group(group) => Some(group),
            LayerNode::Pixel(_) => None,
        }
    }

    fn visit_pixels_mut(&mut self, f: &mut impl FnMut(&mut PixelLayer)) {
        match self {
            LayerNode::Pixel(layer) => f(layer),
            LayerNode::Group(group) => {
                for child in &mut group.layers {
                    child.visit_pixels_mut(f);
                }
            }
        }
    }
}

/// Canvas geometry shared by a source document and the documents created from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub width: u32,
    pub height: u32,
    /// Pixels per inch
    pub resolution: f64,
    pub pixel_aspect_ratio: f64,
    pub bits_per_channel: u8,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            resolution: 72.0,
            pixel_aspect_ratio: 1.0,
            bits_per_channel: 8,
        }
    }
}

/// The document whose top-level groups are exported
///
/// Only `active_layer` is ever modified during an export run.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub name: String,
    pub settings: DocumentSettings,
    pub color_mode: ColorMode,
    /// Top-level layers, top-to-bottom
    pub layers: Vec<LayerNode>,
    /// Index into `layers` of the current selection
    pub active_layer: Option<usize>,
}

impl SourceDocument {
    /// Top-level groups with their index in `layers`, in stack order
    pub fn groups(&self) -> impl Iterator<Item = (usize, &LayerGroup)> {
        self.layers
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.as_group().map(|group| (index, group)))
    }

    pub fn group_count(&self) -> usize {
        self.groups().count()
    }

    /// Make the top-level layer at `index` the active selection
    pub fn select_layer(&mut self, index: usize) {
        self.active_layer = Some(index);
    }

    pub fn active_layer_name(&self) -> Option<&str> {
        self.active_layer
            .and_then(|index| self.layers.get(index))
            .map(LayerNode::name)
    }
}

/// Builder for [`SourceDocument`]
///
/// ```
/// use groupsplit::domain::{ColorMode, LayerGroup, LayerNode, SourceDocumentBuilder};
///
/// let document = SourceDocumentBuilder::new("poster", 1000, 800)
///     .resolution(300.0)
///     .color_mode(ColorMode::Cmyk)
///     .layer(LayerNode::Group(LayerGroup::new("Logo", Vec::new())))
///     .build()
///     .unwrap();
/// assert_eq!(document.group_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SourceDocumentBuilder {
    name: String,
    settings: DocumentSettings,
    color_mode: ColorMode,
    layers: Vec<LayerNode>,
}

impl SourceDocumentBuilder {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            settings: DocumentSettings {
                width,
                height,
                ..DocumentSettings::default()
            },
            color_mode: ColorMode::Rgb,
            layers: Vec::new(),
        }
    }

    pub fn resolution(mut self, resolution: f64) -> Self {
        self.settings.resolution = resolution;
        self
    }

    pub fn pixel_aspect_ratio(mut self, ratio: f64) -> Self {
        self.settings.pixel_aspect_ratio = ratio;
        self
    }

    pub fn bits_per_channel(mut self, bits: u8) -> Self {
        self.settings.bits_per_channel = bits;
        self
    }

    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Append a layer below the ones already added
    pub fn layer(mut self, layer: LayerNode) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(mut self, layers: impl IntoIterator<Item = LayerNode>) -> Self {
        self.layers.extend(layers);
        self
    }

    pub fn build(self) -> Result<SourceDocument> {
        if self.settings.width == 0 || self.settings.height == 0 {
            return Err(GroupSplitError::Validation(format!(
                "Document '{}' must have a non-zero size, got {}x{}",
                self.name, self.settings.width, self.settings.height
            )));
        }
        if !(self.settings.resolution.is_finite() && self.settings.resolution > 0.0) {
            return Err(GroupSplitError::Validation(format!(
                "Document '{}' resolution must be > 0, got {}",
                self.name, self.settings.resolution
            )));
        }
        if !(self.settings.pixel_aspect_ratio.is_finite() && self.settings.pixel_aspect_ratio > 0.0)
        {
            return Err(GroupSplitError::Validation(format!(
                "Document '{}' pixel aspect ratio must be > 0, got {}",
                self.name, self.settings.pixel_aspect_ratio
            )));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.settings.bits_per_channel) {
            return Err(GroupSplitError::Validation(format!(
                "Document '{}' bits per channel must be one of 1, 8, 16, 32, got {}",
                self.name, self.settings.bits_per_channel
            )));
        }

        Ok(SourceDocument {
            name: self.name,
            settings: self.settings,
            color_mode: self.color_mode,
            layers: self.layers,
            active_layer: None,
        })
    }
}

/// How a new document's canvas starts out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFill {
    Transparent,
    White,
}

/// Parameters for creating a new document
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocumentSpec {
    pub name: String,
    pub settings: DocumentSettings,
    pub mode: NewDocumentMode,
    pub fill: DocumentFill,
}

impl NewDocumentSpec {
    /// Spec for a transparent document mirroring `source`'s canvas
    pub fn mirroring(source: &SourceDocument, name: impl Into<String>, mode: NewDocumentMode) -> Self {
        Self {
            name: name.into(),
            settings: source.settings,
            mode,
            fill: DocumentFill::Transparent,
        }
    }
}

/// A document created by the host
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredDocument {
    pub name: String,
    pub settings: DocumentSettings,
    pub mode: NewDocumentMode,
    /// Layers, top-to-bottom
    pub layers: Vec<LayerNode>,
}

impl LayeredDocument {
    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub fn canvas(&self) -> Rect {
        Rect::new(0, 0, self.settings.width, self.settings.height)
    }

    /// Total number of layers, groups and nested layers included
    pub fn layer_count(&self) -> usize {
        self.layers
            .iter()
            .map(|node| match node {
                LayerNode::Pixel(_) => 1,
                LayerNode::Group(group) => 1 + group.descendant_count(),
            })
            .sum()
    }

    /// Apply `f` to every pixel layer, nested ones included
    pub fn for_each_pixel_layer_mut(&mut self, mut f: impl FnMut(&mut PixelLayer)) {
        for node in &mut self.layers {
            node.visit_pixels_mut(&mut f);
        }
    }

    /// Composite all visible layers onto a transparent canvas
    ///
    /// Groups pass their children through with their own opacity multiplied in.
    pub fn flatten(&self) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.settings.width, self.settings.height);
        composite_nodes(&self.layers, &mut canvas, 1.0);
        canvas
    }

    /// Tightest rectangle containing every pixel that is not fully transparent
    pub fn content_bounds(&self) -> Option<Rect> {
        opaque_bounds(&self.flatten())
    }
}

/// Bounding box of the pixels with alpha > 0
pub fn opaque_bounds(image: &RgbaImage) -> Option<Rect> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    found.then(|| {
        Rect::new(
            i64::from(min_x),
            i64::from(min_y),
            max_x - min_x + 1,
            max_y - min_y + 1,
        )
    })
}

fn composite_nodes(nodes: &[LayerNode], canvas: &mut RgbaImage, parent_opacity: f32) {
    // Stack order is top-to-bottom, painting goes bottom-up.
    for node in nodes.iter().rev() {
        match node {
            LayerNode::Pixel(layer) => {
                if layer.visible {
                    let opacity = parent_opacity * f32::from(layer.opacity) / 255.0;
                    composite_layer(layer, canvas, opacity);
                }
            }
            LayerNode::Group(group) => {
                if group.visible {
                    let opacity = parent_opacity * f32::from(group.opacity) / 255.0;
                    composite_nodes(&group.layers, canvas, opacity);
                }
            }
        }
    }
}

fn composite_layer(layer: &PixelLayer, canvas: &mut RgbaImage, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }
    let canvas_rect = Rect::new(0, 0, canvas.width(), canvas.height());
    let Some(area) = layer.bounds().intersect(&canvas_rect) else {
        return;
    };

    for y in area.top..area.bottom() {
        for x in area.left..area.right() {
            let src = layer
                .pixels
                .get_pixel((x - layer.left) as u32, (y - layer.top) as u32);
            let src_a = f32::from(src[3]) / 255.0 * opacity;
            if src_a <= 0.0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(x as u32, y as u32);
            let dst_a = f32::from(dst[3]) / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            for c in 0..3 {
                let value = (f32::from(src[c]) * src_a
                    + f32::from(dst[c]) * dst_a * (1.0 - src_a))
                    / out_a;
                dst[c] = value.round().clamp(0.0, 255.0) as u8;
            }
            dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}
