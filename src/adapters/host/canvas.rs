//! In-memory document host
//!
//! [`CanvasHost`] keeps documents as plain [`LayeredDocument`] values and
//! enforces the limits a desktop editor would: canvas size, resolution and
//! aspect ratio ranges, valid bit depths per mode, and a cap on how many
//! documents may be open at the same time.

use super::traits::DocumentHost;
use crate::domain::{
    DocumentFill, HostError, LayerNode, LayeredDocument, NewDocumentMode, NewDocumentSpec,
    PixelLayer, Rect, SourceDocument,
};
use image::{imageops, Rgba, RgbaImage};

/// Largest width or height of a document, in pixels
pub const MAX_CANVAS_DIMENSION: u32 = 30_000;

/// Accepted pixel aspect ratio range, inclusive
pub const PIXEL_ASPECT_RATIO_RANGE: (f64, f64) = (0.1, 10.0);

/// Host keeping documents in memory
#[derive(Debug)]
pub struct CanvasHost {
    max_open_documents: usize,
    open_documents: usize,
}

impl CanvasHost {
    /// Create a host that allows a single open document
    pub fn new() -> Self {
        Self::with_max_open_documents(1)
    }

    /// Create a host that allows up to `max` open documents
    pub fn with_max_open_documents(max: usize) -> Self {
        Self {
            max_open_documents: max.max(1),
            open_documents: 0,
        }
    }

    /// Number of documents created and not yet closed
    pub fn open_documents(&self) -> usize {
        self.open_documents
    }

    fn validate(&self, spec: &NewDocumentSpec) -> Result<(), HostError> {
        let settings = &spec.settings;

        if settings.width == 0
            || settings.height == 0
            || settings.width > MAX_CANVAS_DIMENSION
            || settings.height > MAX_CANVAS_DIMENSION
        {
            return Err(HostError::InvalidDocument(format!(
                "canvas size {}x{} is outside 1..={MAX_CANVAS_DIMENSION} pixels",
                settings.width, settings.height
            )));
        }

        if !(settings.resolution.is_finite() && settings.resolution > 0.0) {
            return Err(HostError::InvalidDocument(format!(
                "resolution must be > 0, got {}",
                settings.resolution
            )));
        }

        let (min_ratio, max_ratio) = PIXEL_ASPECT_RATIO_RANGE;
        if !(min_ratio..=max_ratio).contains(&settings.pixel_aspect_ratio) {
            return Err(HostError::InvalidDocument(format!(
                "pixel aspect ratio {} is outside {min_ratio}..={max_ratio}",
                settings.pixel_aspect_ratio
            )));
        }

        let valid_depths: &[u8] = match spec.mode {
            NewDocumentMode::Bitmap => &[1],
            NewDocumentMode::Lab | NewDocumentMode::Cmyk => &[8, 16],
            NewDocumentMode::Rgb | NewDocumentMode::Grayscale => &[8, 16, 32],
        };
        if !valid_depths.contains(&settings.bits_per_channel) {
            return Err(HostError::InvalidDocument(format!(
                "{}-bit is not available for {} documents",
                settings.bits_per_channel, spec.mode
            )));
        }

        if spec.mode == NewDocumentMode::Bitmap && spec.fill == DocumentFill::Transparent {
            return Err(HostError::InvalidDocument(
                "Bitmap documents cannot have a transparent background".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CanvasHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentHost for CanvasHost {
    fn create_document(&mut self, spec: &NewDocumentSpec) -> Result<LayeredDocument, HostError> {
        if self.open_documents >= self.max_open_documents {
            return Err(HostError::ResourceLimit(format!(
                "{} document(s) already open (limit {})",
                self.open_documents, self.max_open_documents
            )));
        }
        self.validate(spec)?;

        let layers = match spec.fill {
            DocumentFill::Transparent => Vec::new(),
            DocumentFill::White => vec![LayerNode::Pixel(PixelLayer::new(
                "Background",
                0,
                0,
                RgbaImage::from_pixel(
                    spec.settings.width,
                    spec.settings.height,
                    Rgba([255, 255, 255, 255]),
                ),
            ))],
        };

        self.open_documents += 1;
        tracing::debug!(
            name = %spec.name,
            width = spec.settings.width,
            height = spec.settings.height,
            mode = %spec.mode,
            open_documents = self.open_documents,
            "Created document"
        );

        Ok(LayeredDocument {
            name: spec.name.clone(),
            settings: spec.settings,
            mode: spec.mode,
            layers,
        })
    }

    fn duplicate_group(
        &mut self,
        source: &SourceDocument,
        group_index: usize,
        target: &mut LayeredDocument,
    ) -> Result<(), HostError> {
        let node = source
            .layers
            .get(group_index)
            .ok_or(HostError::GroupNotFound(group_index))?;
        let group = node
            .as_group()
            .ok_or_else(|| HostError::NotAGroup(node.name().to_string()))?;

        target.layers.insert(0, LayerNode::Group(group.clone()));

        tracing::debug!(
            group = %group.name,
            target = %target.name,
            layers = group.descendant_count(),
            "Duplicated group into target"
        );
        Ok(())
    }

    fn trim_transparent(&mut self, target: &mut LayeredDocument) -> Result<(), HostError> {
        let Some(bounds) = target.content_bounds() else {
            tracing::warn!(
                document = %target.name,
                "Nothing to trim, document is fully transparent"
            );
            return Ok(());
        };

        if bounds == target.canvas() {
            return Ok(());
        }

        target.for_each_pixel_layer_mut(|layer| crop_layer(layer, &bounds));
        target.settings.width = bounds.width;
        target.settings.height = bounds.height;

        tracing::debug!(
            document = %target.name,
            left = bounds.left,
            top = bounds.top,
            width = bounds.width,
            height = bounds.height,
            "Trimmed transparent edges"
        );
        Ok(())
    }

    fn close_document(&mut self, document: LayeredDocument) {
        self.open_documents = self.open_documents.saturating_sub(1);
        tracing::debug!(
            name = %document.name,
            open_documents = self.open_documents,
            "Closed document without saving"
        );
    }
}

/// Cut a layer down to `canvas` and re-base it on the canvas' top-left corner
fn crop_layer(layer: &mut PixelLayer, canvas: &Rect) {
    match layer.bounds().intersect(canvas) {
        Some(area) => {
            let x = (area.left - layer.left) as u32;
            let y = (area.top - layer.top) as u32;
            layer.pixels = imageops::crop_imm(&layer.pixels, x, y, area.width, area.height).to_image();
            layer.left = area.left - canvas.left;
            layer.top = area.top - canvas.top;
        }
        None => {
            layer.pixels = RgbaImage::new(0, 0);
            layer.left = 0;
            layer.top = 0;
        }
    }
}
