//! Manifest data models
//!
//! A manifest is a JSON description of a layered document. Layers are listed
//! top-to-bottom, as they appear in a layers panel.

use crate::domain::ColorMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level manifest document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentManifest {
    /// Document name, defaults to the manifest file stem
    #[serde(default)]
    pub name: Option<String>,

    pub width: u32,

    pub height: u32,

    /// Pixels per inch
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    #[serde(default = "default_pixel_aspect_ratio")]
    pub pixel_aspect_ratio: f64,

    #[serde(default = "default_bits_per_channel")]
    pub bits_per_channel: u8,

    #[serde(default = "default_color_mode")]
    pub color_mode: ColorMode,

    /// Index of the initially selected top-level layer
    #[serde(default)]
    pub active_layer: Option<usize>,

    #[serde(default)]
    pub layers: Vec<LayerManifest>,
}

/// One entry of a `layers` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerManifest {
    Group {
        name: String,
        #[serde(default = "default_visible")]
        visible: bool,
        #[serde(default = "default_opacity")]
        opacity: u8,
        #[serde(default)]
        layers: Vec<LayerManifest>,
    },
    /// Pixel layer decoded from an image file
    Image {
        name: String,
        /// Relative paths resolve against the manifest's directory
        path: PathBuf,
        #[serde(default)]
        left: i64,
        #[serde(default)]
        top: i64,
        #[serde(default = "default_visible")]
        visible: bool,
        #[serde(default = "default_opacity")]
        opacity: u8,
    },
    /// Solid-color rectangle
    Fill {
        name: String,
        /// RGBA
        color: [u8; 4],
        #[serde(default)]
        left: i64,
        #[serde(default)]
        top: i64,
        width: u32,
        height: u32,
        #[serde(default = "default_visible")]
        visible: bool,
        #[serde(default = "default_opacity")]
        opacity: u8,
    },
}

fn default_resolution() -> f64 {
    72.0
}

fn default_pixel_aspect_ratio() -> f64 {
    1.0
}

fn default_bits_per_channel() -> u8 {
    8
}

fn default_color_mode() -> ColorMode {
    ColorMode::Rgb
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> u8 {
    255
}
