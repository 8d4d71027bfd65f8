//! Raster inspection for embedding
//!
//! JPEG data is embedded as-is (DCTDecode), so only its header is read.
//! PNG data is decoded and split into a color plane and an optional alpha
//! plane.

use image::DynamicImage;

/// Frame header values of a JPEG stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegInfo {
    pub width: u32,
    pub height: u32,
    pub components: u8,
    pub bits_per_component: u8,
}

/// Read the start-of-frame header of a JPEG stream.
///
/// Returns `None` for data that is not a JPEG or has no frame header before
/// the scan data.
pub fn read_jpeg_info(bytes: &[u8]) -> Option<JpegInfo> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return None;
    }

    let mut i = 2;
    while i + 1 < bytes.len() {
        if bytes[i] != 0xFF {
            return None;
        }
        let marker = bytes[i + 1];

        // Fill bytes
        if marker == 0xFF {
            i += 1;
            continue;
        }
        // Standalone markers carry no length
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }
        // End of image or start of scan before any frame header
        if marker == 0xD9 || marker == 0xDA {
            return None;
        }

        let length = u16::from_be_bytes([*bytes.get(i + 2)?, *bytes.get(i + 3)?]) as usize;
        if length < 2 {
            return None;
        }

        if is_start_of_frame(marker) {
            let segment = bytes.get(i + 4..i + 2 + length)?;
            if segment.len() < 6 {
                return None;
            }
            return Some(JpegInfo {
                bits_per_component: segment[0],
                height: u16::from_be_bytes([segment[1], segment[2]]) as u32,
                width: u16::from_be_bytes([segment[3], segment[4]]) as u32,
                components: segment[5],
            });
        }

        i += 2 + length;
    }

    None
}

/// SOF0..SOF15, excluding DHT (C4), JPG (C8) and DAC (CC)
fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Color model of a decoded plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneColor {
    Gray,
    Rgb,
}

/// 8-bit samples split into color and alpha
#[derive(Debug, Clone)]
pub struct PlanarRaster {
    pub width: u32,
    pub height: u32,
    pub color: PlaneColor,
    pub samples: Vec<u8>,
    /// Present only when some pixel is not fully opaque
    pub alpha: Option<Vec<u8>>,
}

/// Split a decoded image into 8-bit color samples and an alpha plane.
pub fn split_planes(pixels: &DynamicImage) -> PlanarRaster {
    let width = pixels.width();
    let height = pixels.height();
    let color_type = pixels.color();

    let (color, samples, alpha) = match (color_type.has_color(), color_type.has_alpha()) {
        (false, false) => (PlaneColor::Gray, pixels.to_luma8().into_raw(), None),
        (false, true) => {
            let gray_alpha = pixels.to_luma_alpha8();
            let mut samples = Vec::with_capacity((width * height) as usize);
            let mut alpha = Vec::with_capacity((width * height) as usize);
            for px in gray_alpha.pixels() {
                samples.push(px.0[0]);
                alpha.push(px.0[1]);
            }
            (PlaneColor::Gray, samples, Some(alpha))
        }
        (true, false) => (PlaneColor::Rgb, pixels.to_rgb8().into_raw(), None),
        (true, true) => {
            let rgba = pixels.to_rgba8();
            let mut samples = Vec::with_capacity((width * height * 3) as usize);
            let mut alpha = Vec::with_capacity((width * height) as usize);
            for px in rgba.pixels() {
                samples.extend_from_slice(&px.0[..3]);
                alpha.push(px.0[3]);
            }
            (PlaneColor::Rgb, samples, Some(alpha))
        }
    };

    let alpha = alpha.filter(|plane| plane.iter().any(|&a| a < 255));

    PlanarRaster {
        width,
        height,
        color,
        samples,
        alpha,
    }
}
