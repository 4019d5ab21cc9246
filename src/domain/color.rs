//! Color modes and the source → target mode mapping

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color mode of an existing document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// RGB color
    Rgb,
    /// CMYK color
    Cmyk,
    /// Single gray channel
    Grayscale,
    /// CIE L*a*b*
    Lab,
    /// 1-bit black and white
    Bitmap,
    /// Palette based color
    Indexed,
    /// Duotone / tritone / quadtone
    Duotone,
    /// Arbitrary spot channels
    Multichannel,
    /// Anything this crate does not recognise
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorMode::Rgb => "RGB",
            ColorMode::Cmyk => "CMYK",
            ColorMode::Grayscale => "Grayscale",
            ColorMode::Lab => "Lab",
            ColorMode::Bitmap => "Bitmap",
            ColorMode::Indexed => "Indexed",
            ColorMode::Duotone => "Duotone",
            ColorMode::Multichannel => "Multichannel",
            ColorMode::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Color mode accepted when creating a new document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewDocumentMode {
    Rgb,
    Cmyk,
    Grayscale,
    Lab,
    Bitmap,
}

impl NewDocumentMode {
    /// Mode number stored in a PSD file header
    pub fn psd_mode(self) -> u16 {
        match self {
            NewDocumentMode::Bitmap => 0,
            NewDocumentMode::Grayscale => 1,
            NewDocumentMode::Rgb => 3,
            NewDocumentMode::Cmyk => 4,
            NewDocumentMode::Lab => 9,
        }
    }

    /// Inverse of [`NewDocumentMode::psd_mode`]
    pub fn from_psd_mode(mode: u16) -> Option<Self> {
        match mode {
            0 => Some(NewDocumentMode::Bitmap),
            1 => Some(NewDocumentMode::Grayscale),
            3 => Some(NewDocumentMode::Rgb),
            4 => Some(NewDocumentMode::Cmyk),
            9 => Some(NewDocumentMode::Lab),
            _ => None,
        }
    }

    /// Number of color channels, not counting transparency
    pub fn color_channels(self) -> usize {
        match self {
            NewDocumentMode::Bitmap | NewDocumentMode::Grayscale => 1,
            NewDocumentMode::Rgb | NewDocumentMode::Lab => 3,
            NewDocumentMode::Cmyk => 4,
        }
    }
}

impl fmt::Display for NewDocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NewDocumentMode::Rgb => "RGB",
            NewDocumentMode::Cmyk => "CMYK",
            NewDocumentMode::Grayscale => "Grayscale",
            NewDocumentMode::Lab => "Lab",
            NewDocumentMode::Bitmap => "Bitmap",
        };
        f.write_str(name)
    }
}

impl ColorMode {
    /// The same mode for a new document, `None` when new documents cannot
    /// be created in this mode
    pub fn creatable(self) -> Option<NewDocumentMode> {
        match self {
            ColorMode::Rgb => Some(NewDocumentMode::Rgb),
            ColorMode::Cmyk => Some(NewDocumentMode::Cmyk),
            ColorMode::Grayscale => Some(NewDocumentMode::Grayscale),
            ColorMode::Lab => Some(NewDocumentMode::Lab),
            ColorMode::Bitmap => Some(NewDocumentMode::Bitmap),
            ColorMode::Indexed
            | ColorMode::Duotone
            | ColorMode::Multichannel
            | ColorMode::Unknown => None,
        }
    }
}

/// Map a source document's color mode to the mode used for the new document
///
/// The five modes a new document can be created in map to themselves; every
/// other mode (indexed, duotone, multichannel, unknown) falls back to RGB.
pub fn map_color_mode(source: ColorMode) -> NewDocumentMode {
    source.creatable().unwrap_or(NewDocumentMode::Rgb)
}
