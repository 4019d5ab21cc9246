//! Per-mode channel encoding
//!
//! Layers are held as 8-bit RGBA. This module turns them into the planar
//! channel data a PSD file stores for the document's color mode and depth.

use crate::domain::{HostError, NewDocumentMode};
use image::RgbaImage;

/// Channel id PSD uses for layer transparency
pub const TRANSPARENCY_CHANNEL: i16 = -1;

/// One encoded channel of a layer
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPlane {
    pub id: i16,
    /// Row-major samples at the document depth, big-endian
    pub data: Vec<u8>,
}

/// Bytes per sample at a given bit depth
pub fn bytes_per_sample(depth: u8) -> Result<usize, HostError> {
    match depth {
        8 => Ok(1),
        16 => Ok(2),
        32 => Ok(4),
        other => Err(HostError::Codec(format!(
            "{other}-bit channels cannot be written to a layered file"
        ))),
    }
}

/// Channel ids of a layer in the order they are written: transparency first
pub fn layer_channel_ids(mode: NewDocumentMode) -> Vec<i16> {
    std::iter::once(TRANSPARENCY_CHANNEL)
        .chain((0..mode.color_channels()).map(|id| id as i16))
        .collect()
}

/// Encode a layer's pixels into transparency + color planes
pub fn encode_layer_channels(
    pixels: &RgbaImage,
    mode: NewDocumentMode,
    depth: u8,
) -> Result<Vec<ChannelPlane>, HostError> {
    let sample_size = bytes_per_sample(depth)?;
    let color_count = color_channel_count(mode)?;
    let capacity = pixels.width() as usize * pixels.height() as usize * sample_size;

    let mut alpha = Vec::with_capacity(capacity);
    let mut colors: Vec<Vec<u8>> = (0..color_count)
        .map(|_| Vec::with_capacity(capacity))
        .collect();

    for pixel in pixels.pixels() {
        push_sample(&mut alpha, pixel[3], depth);
        let values = convert_pixel([pixel[0], pixel[1], pixel[2]], mode);
        for (plane, value) in colors.iter_mut().zip(values) {
            push_sample(plane, value, depth);
        }
    }

    let mut planes = vec![ChannelPlane {
        id: TRANSPARENCY_CHANNEL,
        data: alpha,
    }];
    planes.extend(colors.into_iter().enumerate().map(|(id, data)| ChannelPlane {
        id: id as i16,
        data,
    }));
    Ok(planes)
}

/// Encode the merged image: color channels only, composited over white
pub fn encode_composite(
    flattened: &RgbaImage,
    mode: NewDocumentMode,
    depth: u8,
) -> Result<Vec<Vec<u8>>, HostError> {
    let sample_size = bytes_per_sample(depth)?;
    let color_count = color_channel_count(mode)?;
    let capacity = flattened.width() as usize * flattened.height() as usize * sample_size;
    let mut colors: Vec<Vec<u8>> = (0..color_count)
        .map(|_| Vec::with_capacity(capacity))
        .collect();

    for pixel in flattened.pixels() {
        let alpha = u32::from(pixel[3]);
        let over_white = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        let rgb = [over_white(pixel[0]), over_white(pixel[1]), over_white(pixel[2])];
        let values = convert_pixel(rgb, mode);
        for (plane, value) in colors.iter_mut().zip(values) {
            push_sample(plane, value, depth);
        }
    }

    Ok(colors)
}

fn color_channel_count(mode: NewDocumentMode) -> Result<usize, HostError> {
    if mode == NewDocumentMode::Bitmap {
        return Err(HostError::Codec(
            "Bitmap documents cannot be saved with layers".to_string(),
        ));
    }
    Ok(mode.color_channels())
}

fn push_sample(plane: &mut Vec<u8>, value: u8, depth: u8) {
    match depth {
        16 => plane.extend_from_slice(&(u16::from(value) * 257).to_be_bytes()),
        32 => plane.extend_from_slice(&(f32::from(value) / 255.0).to_be_bytes()),
        _ => plane.push(value),
    }
}

/// Convert an sRGB triple to the channel values of `mode`
///
/// Only the first `mode.color_channels()` entries are meaningful.
pub fn convert_pixel(rgb: [u8; 3], mode: NewDocumentMode) -> [u8; 4] {
    match mode {
        NewDocumentMode::Rgb => [rgb[0], rgb[1], rgb[2], 0],
        NewDocumentMode::Grayscale | NewDocumentMode::Bitmap => [luma(rgb), 0, 0, 0],
        NewDocumentMode::Cmyk => rgb_to_cmyk(rgb),
        NewDocumentMode::Lab => {
            let [l, a, b] = rgb_to_lab(rgb);
            [l, a, b, 0]
        }
    }
}

fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(f64::from);
    (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
}

/// CMYK ink coverage, stored inverted (255 = no ink)
fn rgb_to_cmyk(rgb: [u8; 3]) -> [u8; 4] {
    let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
    let k = 1.0 - r.max(g).max(b);
    let (c, m, y) = if k >= 1.0 {
        (0.0, 0.0, 0.0)
    } else {
        (
            (1.0 - r - k) / (1.0 - k),
            (1.0 - g - k) / (1.0 - k),
            (1.0 - b - k) / (1.0 - k),
        )
    };
    [c, m, y, k].map(|ink| (255.0 - ink * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// sRGB (D65) to CIE L*a*b*, in PSD's 8-bit encoding
fn rgb_to_lab(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| srgb_to_linear(f64::from(c) / 255.0));

    let x = (0.4124 * r + 0.3576 * g + 0.1805 * b) / 0.95047;
    let y = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    let z = (0.0193 * r + 0.1192 * g + 0.9505 * b) / 1.08883;

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    [
        (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
        (a + 128.0).round().clamp(0.0, 255.0) as u8,
        (b + 128.0).round().clamp(0.0, 255.0) as u8,
    ]
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_layer_channel_ids_per_mode() {
        assert_eq!(layer_channel_ids(NewDocumentMode::Rgb), vec![-1, 0, 1, 2]);
        assert_eq!(layer_channel_ids(NewDocumentMode::Grayscale), vec![-1, 0]);
        assert_eq!(layer_channel_ids(NewDocumentMode::Cmyk), vec![-1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_rgb_layer_planes() {
        let pixels = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 128]));
        let planes = encode_layer_channels(&pixels, NewDocumentMode::Rgb, 8).unwrap();

        assert_eq!(planes.len(), 4);
        assert_eq!(planes[0], ChannelPlane { id: -1, data: vec![128, 128] });
        assert_eq!(planes[1].data, vec![10, 10]);
        assert_eq!(planes[3].data, vec![30, 30]);
    }

    #[test]
    fn test_sixteen_bit_samples_scale_to_full_range() {
        let pixels = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 1, 255]));
        let planes = encode_layer_channels(&pixels, NewDocumentMode::Rgb, 16).unwrap();
        assert_eq!(planes[1].data, vec![0xFF, 0xFF]);
        assert_eq!(planes[2].data, vec![0x00, 0x00]);
        assert_eq!(planes[3].data, 257u16.to_be_bytes().to_vec());
    }

    #[test]
    fn test_thirty_two_bit_samples_are_floats() {
        let pixels = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let planes = encode_layer_channels(&pixels, NewDocumentMode::Grayscale, 32).unwrap();
        assert_eq!(planes[0].data, 1.0f32.to_be_bytes().to_vec());
    }

    #[test]
    fn test_bitmap_cannot_be_encoded() {
        let pixels = RgbaImage::new(1, 1);
        assert!(encode_layer_channels(&pixels, NewDocumentMode::Bitmap, 8).is_err());
    }

    #[test]
    fn test_unsupported_depth() {
        assert!(bytes_per_sample(1).is_err());
        assert_eq!(bytes_per_sample(16).unwrap(), 2);
    }

    #[test]
    fn test_cmyk_is_stored_inverted() {
        assert_eq!(convert_pixel([255, 255, 255], NewDocumentMode::Cmyk), [255, 255, 255, 255]);
        assert_eq!(convert_pixel([0, 0, 0], NewDocumentMode::Cmyk), [255, 255, 255, 0]);
        assert_eq!(convert_pixel([0, 255, 255], NewDocumentMode::Cmyk), [0, 255, 255, 255]);
    }

    #[test]
    fn test_lab_white_and_black() {
        let white = convert_pixel([255, 255, 255], NewDocumentMode::Lab);
        assert_eq!(white[0], 255);
        assert!((i16::from(white[1]) - 128).abs() <= 1);
        assert!((i16::from(white[2]) - 128).abs() <= 1);

        let black = convert_pixel([0, 0, 0], NewDocumentMode::Lab);
        assert_eq!(&black[..3], &[0, 128, 128]);
    }

    #[test]
    fn test_grayscale_luma() {
        assert_eq!(convert_pixel([255, 255, 255], NewDocumentMode::Grayscale)[0], 255);
        assert_eq!(convert_pixel([255, 0, 0], NewDocumentMode::Grayscale)[0], 76);
    }

    #[test]
    fn test_composite_over_white() {
        let flattened = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let planes = encode_composite(&flattened, NewDocumentMode::Rgb, 8).unwrap();
        assert_eq!(planes, vec![vec![255], vec![255], vec![255]]);
    }
}
