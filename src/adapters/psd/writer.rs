//! Layered PSD writer
//!
//! Produces version 1 PSD files with raw (uncompressed) channel data. Groups
//! are written as folder sections so the layer tree opens exactly as it was
//! built, and every layer keeps its own transparency channel.

use super::channels::{encode_composite, encode_layer_channels, layer_channel_ids, ChannelPlane};
use crate::adapters::host::LayeredWriter;
use crate::domain::{HostError, LayerGroup, LayerNode, LayeredDocument, NewDocumentMode, PixelLayer};
use std::fs;
use std::path::Path;

/// File signature of a PSD document
pub const PSD_SIGNATURE: &[u8; 4] = b"8BPS";
/// Signature of resource blocks and additional layer information
const RESOURCE_SIGNATURE: &[u8; 4] = b"8BIM";
/// ResolutionInfo image resource
pub const RESOURCE_RESOLUTION_INFO: u16 = 0x03ED;
/// Pixel aspect ratio image resource
pub const RESOURCE_PIXEL_ASPECT_RATIO: u16 = 0x0428;
/// Name Photoshop gives the hidden layer closing a group
const GROUP_END_NAME: &str = "</Layer group>";

/// Section divider types stored in `lsct`
const SECTION_OPEN_FOLDER: u32 = 1;
const SECTION_BOUNDING_DIVIDER: u32 = 3;

/// Writer for layered `.psd` files
#[derive(Debug, Default, Clone)]
pub struct PsdWriter;

impl PsdWriter {
    pub fn new() -> Self {
        Self
    }

    /// Encode `document` into the bytes of a PSD file
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Codec`] for Bitmap documents, unsupported bit
    /// depths and layers placed outside the 32-bit coordinate range.
    pub fn encode(&self, document: &LayeredDocument) -> Result<Vec<u8>, HostError> {
        let depth = document.settings.bits_per_channel;
        let mut out = PsdBuffer::default();

        // Header
        out.bytes(PSD_SIGNATURE);
        out.u16(1);
        out.bytes(&[0; 6]);
        out.u16(document.mode.color_channels() as u16);
        out.u32(document.height());
        out.u32(document.width());
        out.u16(u16::from(depth));
        out.u16(document.mode.psd_mode());

        // Color mode data, empty for every mode we write
        out.u32(0);

        let resources = encode_resources(document);
        out.u32(section_length(resources.len(), "image resource section")?);
        out.bytes(&resources);

        let layers = encode_layer_section(document)?;
        out.u32(section_length(layers.len(), "layer section")?);
        out.bytes(&layers);

        // Merged image
        out.u16(0);
        for plane in encode_composite(&document.flatten(), document.mode, depth)? {
            out.bytes(&plane);
        }

        Ok(out.into_inner())
    }
}

impl LayeredWriter for PsdWriter {
    fn write_layered(&mut self, document: &LayeredDocument, path: &Path) -> Result<(), HostError> {
        let bytes = self.encode(document)?;
        fs::write(path, &bytes)?;

        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            layers = document.layer_count(),
            "Wrote layered document"
        );
        Ok(())
    }
}

fn encode_resources(document: &LayeredDocument) -> Vec<u8> {
    let mut out = PsdBuffer::default();

    // Resolution as 16.16 fixed point, pixels per inch
    let fixed = (document.settings.resolution * 65536.0).round() as u32;
    let mut resolution = PsdBuffer::default();
    resolution.u32(fixed);
    resolution.u16(1);
    resolution.u16(1);
    resolution.u32(fixed);
    resolution.u16(1);
    resolution.u16(1);
    resource_block(&mut out, RESOURCE_RESOLUTION_INFO, &resolution.into_inner());

    let mut aspect = PsdBuffer::default();
    aspect.u32(2);
    aspect.f64(document.settings.pixel_aspect_ratio);
    resource_block(&mut out, RESOURCE_PIXEL_ASPECT_RATIO, &aspect.into_inner());

    out.into_inner()
}

fn resource_block(out: &mut PsdBuffer, id: u16, data: &[u8]) {
    out.bytes(RESOURCE_SIGNATURE);
    out.u16(id);
    // Empty pascal name, padded to even length
    out.bytes(&[0, 0]);
    out.u32(data.len() as u32);
    out.bytes(data);
    out.pad_to(2);
}

/// Record in file order, which is bottom-to-top
enum Record<'a> {
    Pixel(&'a PixelLayer),
    GroupEnd,
    GroupStart(&'a LayerGroup),
}

fn collect_records<'a>(nodes: &'a [LayerNode], records: &mut Vec<Record<'a>>) {
    for node in nodes.iter().rev() {
        match node {
            LayerNode::Pixel(layer) => records.push(Record::Pixel(layer)),
            LayerNode::Group(group) => {
                records.push(Record::GroupEnd);
                collect_records(&group.layers, records);
                records.push(Record::GroupStart(group));
            }
        }
    }
}

fn encode_layer_section(document: &LayeredDocument) -> Result<Vec<u8>, HostError> {
    let mut records = Vec::new();
    collect_records(&document.layers, &mut records);
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let depth = document.settings.bits_per_channel;
    let count = i16::try_from(records.len()).map_err(|_| {
        HostError::Codec(format!("{} layers exceed the PSD layer limit", records.len()))
    })?;

    let mut info = PsdBuffer::default();
    let mut channel_data = PsdBuffer::default();
    info.i16(count);

    for record in &records {
        let planes = match record {
            Record::Pixel(layer) => encode_layer_channels(&layer.pixels, document.mode, depth)?,
            Record::GroupEnd | Record::GroupStart(_) => empty_planes(document.mode),
        };

        match record {
            Record::Pixel(layer) => {
                let bounds = layer_bounds(layer)?;
                write_record(
                    &mut info,
                    bounds,
                    &planes,
                    b"norm",
                    layer.opacity,
                    layer.visible,
                    &layer.name,
                    None,
                )?;
            }
            Record::GroupEnd => write_record(
                &mut info,
                [0; 4],
                &planes,
                b"norm",
                255,
                false,
                GROUP_END_NAME,
                Some(SECTION_BOUNDING_DIVIDER),
            )?,
            Record::GroupStart(group) => write_record(
                &mut info,
                [0; 4],
                &planes,
                b"pass",
                group.opacity,
                group.visible,
                &group.name,
                Some(SECTION_OPEN_FOLDER),
            )?,
        }

        for plane in &planes {
            channel_data.u16(0);
            channel_data.bytes(&plane.data);
        }
    }

    info.bytes(&channel_data.into_inner());
    info.pad_to(2);
    let info = info.into_inner();

    let mut section = PsdBuffer::default();
    section.u32(section_length(info.len(), "layer info")?);
    section.bytes(&info);
    // Global layer mask info
    section.u32(0);
    Ok(section.into_inner())
}

fn empty_planes(mode: NewDocumentMode) -> Vec<ChannelPlane> {
    layer_channel_ids(mode)
        .into_iter()
        .map(|id| ChannelPlane {
            id,
            data: Vec::new(),
        })
        .collect()
}

/// Lengths in a version-1 PSD are stored as u32
fn section_length(len: usize, what: &str) -> Result<u32, HostError> {
    u32::try_from(len).map_err(|_| {
        HostError::Codec(format!(
            "{what} of {len} bytes exceeds the PSD size limit of {} bytes",
            u32::MAX
        ))
    })
}

/// top, left, bottom, right
fn layer_bounds(layer: &PixelLayer) -> Result<[i32; 4], HostError> {
    let bounds = layer.bounds();
    let convert = |value: i64| {
        i32::try_from(value).map_err(|_| {
            HostError::Codec(format!(
                "layer '{}' lies outside the addressable canvas",
                layer.name
            ))
        })
    };
    Ok([
        convert(bounds.top)?,
        convert(bounds.left)?,
        convert(bounds.bottom())?,
        convert(bounds.right())?,
    ])
}

#[allow(clippy::too_many_arguments)]
fn write_record(
    out: &mut PsdBuffer,
    bounds: [i32; 4],
    planes: &[ChannelPlane],
    blend_mode: &[u8; 4],
    opacity: u8,
    visible: bool,
    name: &str,
    section: Option<u32>,
) -> Result<(), HostError> {
    for edge in bounds {
        out.i32(edge);
    }
    out.u16(planes.len() as u16);
    for plane in planes {
        out.i16(plane.id);
        // Compression marker plus samples
        let length = plane.data.len().saturating_add(2);
        out.u32(section_length(length, "channel data")?);
    }
    out.bytes(RESOURCE_SIGNATURE);
    out.bytes(blend_mode);
    out.u8(opacity);
    // clipping
    out.u8(0);
    out.u8(if visible { 0 } else { 0x02 });
    // filler
    out.u8(0);

    let mut extra = PsdBuffer::default();
    // Layer mask and blending ranges
    extra.u32(0);
    extra.u32(0);
    extra.pascal_string(name, 4);

    let units: Vec<u16> = name.encode_utf16().collect();
    let mut unicode = PsdBuffer::default();
    unicode.u32(units.len() as u32);
    for unit in units {
        unicode.u16(unit);
    }
    additional_info(&mut extra, b"luni", &unicode.into_inner());

    if let Some(kind) = section {
        let mut divider = PsdBuffer::default();
        divider.u32(kind);
        if kind == SECTION_OPEN_FOLDER {
            divider.bytes(RESOURCE_SIGNATURE);
            divider.bytes(blend_mode);
        }
        additional_info(&mut extra, b"lsct", &divider.into_inner());
    }

    let extra = extra.into_inner();
    out.u32(section_length(extra.len(), "layer extra data")?);
    out.bytes(&extra);
    Ok(())
}

fn additional_info(out: &mut PsdBuffer, key: &[u8; 4], data: &[u8]) {
    out.bytes(RESOURCE_SIGNATURE);
    out.bytes(key);
    let padded = data.len() + data.len() % 2;
    out.u32(padded as u32);
    out.bytes(data);
    out.pad_to(2);
}

/// Big-endian byte sink
#[derive(Debug, Default)]
struct PsdBuffer(Vec<u8>);

impl PsdBuffer {
    fn u8(&mut self, value: u8) {
        self.0.push(value);
    }

    fn u16(&mut self, value: u16) {
        self.0.extend_from_slice(&value.to_be_bytes());
    }

    fn i16(&mut self, value: i16) {
        self.0.extend_from_slice(&value.to_be_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.0.extend_from_slice(&value.to_be_bytes());
    }

    fn i32(&mut self, value: i32) {
        self.0.extend_from_slice(&value.to_be_bytes());
    }

    fn f64(&mut self, value: f64) {
        self.0.extend_from_slice(&value.to_be_bytes());
    }

    fn bytes(&mut self, data: &[u8]) {
        self.0.extend_from_slice(data);
    }

    /// Length-prefixed MacRoman-ish name; non-ASCII becomes '?'
    fn pascal_string(&mut self, value: &str, alignment: usize) {
        let encoded: Vec<u8> = value
            .chars()
            .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
            .take(255)
            .collect();
        let start = self.0.len();
        self.u8(encoded.len() as u8);
        self.bytes(&encoded);
        while (self.0.len() - start) % alignment != 0 {
            self.0.push(0);
        }
    }

    fn pad_to(&mut self, alignment: usize) {
        while self.0.len() % alignment != 0 {
            self.0.push(0);
        }
    }

    fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::psd::header::parse_header;
    use crate::domain::DocumentSettings;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn document(mode: NewDocumentMode, depth: u8, layers: Vec<LayerNode>) -> LayeredDocument {
        LayeredDocument {
            name: "Logo".to_string(),
            settings: DocumentSettings {
                width: 8,
                height: 6,
                resolution: 300.0,
                pixel_aspect_ratio: 1.0,
                bits_per_channel: depth,
            },
            mode,
            layers,
        }
    }

    fn logo_group() -> LayerNode {
        LayerNode::Group(LayerGroup::new(
            "Logo",
            vec![LayerNode::Pixel(PixelLayer::new(
                "mark",
                1,
                2,
                RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255])),
            ))],
        ))
    }

    #[test]
    fn test_header_fields() {
        let bytes = PsdWriter::new()
            .encode(&document(NewDocumentMode::Rgb, 8, vec![logo_group()]))
            .unwrap();

        assert_eq!(&bytes[0..4], b"8BPS");
        assert_eq!(&bytes[4..6], &[0, 1]);
        assert_eq!(&bytes[12..14], &3u16.to_be_bytes());
        assert_eq!(&bytes[14..18], &6u32.to_be_bytes());
        assert_eq!(&bytes[18..22], &8u32.to_be_bytes());
        assert_eq!(&bytes[22..24], &8u16.to_be_bytes());
        assert_eq!(&bytes[24..26], &3u16.to_be_bytes());
    }

    #[test]
    fn test_group_is_written_as_three_records() {
        let bytes = PsdWriter::new()
            .encode(&document(NewDocumentMode::Rgb, 8, vec![logo_group()]))
            .unwrap();
        let header = parse_header(&bytes).unwrap();

        // divider, pixel layer, folder
        assert_eq!(header.layer_count, 3);
        assert_eq!(header.resolution, Some(300.0));
    }

    #[test]
    fn test_file_length_matches_declared_sections() {
        let document = document(NewDocumentMode::Cmyk, 16, vec![logo_group()]);
        let bytes = PsdWriter::new().encode(&document).unwrap();

        // Composite: 4 channels of 8x6 at 2 bytes each, preceded by compression
        let composite = 2 + 4 * 8 * 6 * 2;
        let header = parse_header(&bytes).unwrap();
        assert_eq!(bytes.len(), header.image_data_offset + composite);
    }

    #[test]
    fn test_empty_document_has_no_layer_section() {
        let bytes = PsdWriter::new()
            .encode(&document(NewDocumentMode::Grayscale, 8, Vec::new()))
            .unwrap();
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.layer_count, 0);
    }

    #[test]
    fn test_bitmap_documents_are_rejected() {
        let result = PsdWriter::new().encode(&document(NewDocumentMode::Bitmap, 1, vec![logo_group()]));
        assert!(matches!(result, Err(HostError::Codec(_))));
    }

    #[test]
    fn test_section_length_limit() {
        assert_eq!(section_length(1024, "layer section").unwrap(), 1024);
        assert_eq!(section_length(u32::MAX as usize, "layer section").unwrap(), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_oversized_section_is_a_codec_error() {
        let err = section_length(u32::MAX as usize + 1, "layer section").unwrap_err();
        assert!(matches!(err, HostError::Codec(_)));
        assert!(err.to_string().contains("exceeds the PSD size limit"));

        // channel length includes the compression marker
        let err = section_length((u32::MAX as usize - 1).saturating_add(2), "channel data");
        assert!(err.is_err());
    }

    #[test]
    fn test_pascal_string_alignment() {
        let mut buffer = PsdBuffer::default();
        buffer.pascal_string("Logo", 4);
        assert_eq!(buffer.into_inner(), vec![4, b'L', b'o', b'g', b'o', 0, 0, 0]);

        let mut buffer = PsdBuffer::default();
        buffer.pascal_string("Ünïcode", 4);
        let bytes = buffer.into_inner();
        assert_eq!(bytes[0], 7);
        assert_eq!(bytes[1], b'?');
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn test_write_layered_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Logo.psd");
        fs::write(&path, b"stale").unwrap();

        let mut writer = PsdWriter::new();
        writer
            .write_layered(&document(NewDocumentMode::Rgb, 8, vec![logo_group()]), &path)
            .unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(&written[0..4], b"8BPS");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("Logo.psd");
        let result = PsdWriter::new()
            .write_layered(&document(NewDocumentMode::Rgb, 8, vec![logo_group()]), &path);
        assert!(matches!(result, Err(HostError::Io(_))));
    }
}
