//! PSD header readback
//!
//! Reads just enough of a written file to confirm what it contains: the
//! file header, the resolution resource and the number of layer records.

use super::writer::{PSD_SIGNATURE, RESOURCE_RESOLUTION_INFO};
use crate::domain::HostError;
use std::fs;
use std::path::Path;

/// Summary of a PSD file's header sections
#[derive(Debug, Clone, PartialEq)]
pub struct PsdHeader {
    /// Composite channel count
    pub channels: u16,
    pub width: u32,
    pub height: u32,
    pub depth: u16,
    /// Raw PSD color mode number
    pub mode: u16,
    /// Horizontal resolution in pixels per inch, when present
    pub resolution: Option<f64>,
    /// Number of layer records, group markers included
    pub layer_count: usize,
    /// Byte offset of the merged image data section
    pub image_data_offset: usize,
}

/// Read and parse the header of the PSD file at `path`
pub fn read_header(path: &Path) -> Result<PsdHeader, HostError> {
    let bytes = fs::read(path)?;
    parse_header(&bytes)
}

/// Parse the header sections of an in-memory PSD file
pub fn parse_header(bytes: &[u8]) -> Result<PsdHeader, HostError> {
    let mut reader = ByteReader::new(bytes);

    if reader.take(4)? != PSD_SIGNATURE {
        return Err(HostError::Codec("missing 8BPS signature".to_string()));
    }
    let version = reader.u16()?;
    if version != 1 {
        return Err(HostError::Codec(format!("unsupported PSD version {version}")));
    }
    reader.take(6)?;

    let channels = reader.u16()?;
    let height = reader.u32()?;
    let width = reader.u32()?;
    let depth = reader.u16()?;
    let mode = reader.u16()?;

    let color_data = reader.u32()? as usize;
    reader.take(color_data)?;

    let resources_len = reader.u32()? as usize;
    let resolution = find_resolution(reader.take(resources_len)?)?;

    let layers_len = reader.u32()? as usize;
    let layer_section = reader.take(layers_len)?;
    let layer_count = if layer_section.len() >= 6 {
        let mut layers = ByteReader::new(layer_section);
        let info_len = layers.u32()?;
        if info_len >= 2 {
            usize::from(layers.i16()?.unsigned_abs())
        } else {
            0
        }
    } else {
        0
    };

    Ok(PsdHeader {
        channels,
        width,
        height,
        depth,
        mode,
        resolution,
        layer_count,
        image_data_offset: reader.position(),
    })
}

fn find_resolution(resources: &[u8]) -> Result<Option<f64>, HostError> {
    let mut reader = ByteReader::new(resources);
    while reader.remaining() >= 12 {
        if reader.take(4)? != b"8BIM" {
            return Err(HostError::Codec("malformed image resource block".to_string()));
        }
        let id = reader.u16()?;
        let name_len = usize::from(reader.u8()?);
        // Name plus its length byte is padded to even
        reader.take(name_len + (name_len + 1) % 2)?;
        let size = reader.u32()? as usize;
        let data = reader.take(size)?;
        if size % 2 == 1 {
            reader.take(1)?;
        }

        if id == RESOURCE_RESOLUTION_INFO && data.len() >= 4 {
            let fixed = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
            return Ok(Some(f64::from(fixed) / 65536.0));
        }
    }
    Ok(None)
}

struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn position(&self) -> usize {
        self.position
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], HostError> {
        if self.remaining() < len {
            return Err(HostError::Codec(format!(
                "unexpected end of file at byte {}",
                self.position
            )));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, HostError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, HostError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn i16(&mut self) -> Result<i16, HostError> {
        let bytes = self.take(2)?;
        Ok(i16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> Result<u32, HostError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::psd::PsdWriter;
    use crate::domain::{DocumentSettings, LayerNode, LayeredDocument, NewDocumentMode, PixelLayer};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn lab_document() -> LayeredDocument {
        LayeredDocument {
            name: "Badge".to_string(),
            settings: DocumentSettings {
                width: 40,
                height: 20,
                resolution: 144.0,
                pixel_aspect_ratio: 1.0,
                bits_per_channel: 16,
            },
            mode: NewDocumentMode::Lab,
            layers: vec![LayerNode::Pixel(PixelLayer::new(
                "fill",
                0,
                0,
                RgbaImage::from_pixel(40, 20, Rgba([0, 128, 0, 255])),
            ))],
        }
    }

    #[test]
    fn test_read_back_written_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Badge.psd");
        let bytes = PsdWriter::new().encode(&lab_document()).unwrap();
        fs::write(&path, bytes).unwrap();

        let header = read_header(&path).unwrap();
        assert_eq!(header.width, 40);
        assert_eq!(header.height, 20);
        assert_eq!(header.depth, 16);
        assert_eq!(header.channels, 3);
        assert_eq!(header.mode, NewDocumentMode::Lab.psd_mode());
        assert_eq!(header.resolution, Some(144.0));
        assert_eq!(header.layer_count, 1);
    }

    #[test]
    fn test_rejects_wrong_signature() {
        let result = parse_header(b"GIF89a and then some more bytes here");
        assert!(matches!(result, Err(HostError::Codec(_))));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let bytes = PsdWriter::new().encode(&lab_document()).unwrap();
        let result = parse_header(&bytes[..20]);
        assert!(matches!(result, Err(HostError::Codec(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_header(&temp_dir.path().join("nothing.psd"));
        assert!(matches!(result, Err(HostError::Io(_))));
    }
}
