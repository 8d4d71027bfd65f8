//! Export-time rotation and re-encoding
//!
//! Rotation never touches the stored image: it produces a new raster which
//! is then encoded back into the image's own format.

use crate::collection::SourceImage;
use crate::types::{PhotoPdfError, RasterFormat, Result, Rotation};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::io::Cursor;

/// Quality used when re-encoding rotated JPEGs
pub const JPEG_QUALITY: u8 = 95;

/// An encoded raster ready to be embedded
#[derive(Debug, Clone)]
pub struct RenderedRaster<'a> {
    pub bytes: Cow<'a, [u8]>,
    pub format: RasterFormat,
    pub width: u32,
    pub height: u32,
}

/// Rotate pixels clockwise about the image center.
///
/// Quarter turns swap width and height; a half turn keeps them.
pub fn rotate_pixels(pixels: &DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => pixels.clone(),
        Rotation::Clockwise90 => pixels.rotate90(),
        Rotation::Clockwise180 => pixels.rotate180(),
        Rotation::Clockwise270 => pixels.rotate270(),
    }
}

/// Produce the bytes to embed for `image`.
///
/// Unrotated images reuse their original bytes. Rotated images are
/// re-encoded in their original format.
pub fn render_for_export(image: &SourceImage) -> Result<RenderedRaster<'_>> {
    let (width, height) = image.rotated_dimensions();

    if image.rotation() == Rotation::None {
        return Ok(RenderedRaster {
            bytes: Cow::Borrowed(image.encoded()),
            format: image.format(),
            width,
            height,
        });
    }

    let rotated = rotate_pixels(image.pixels(), image.rotation());
    let bytes = encode(&rotated, image.format()).map_err(|e| PhotoPdfError::Rotation {
        name: image.name().to_string(),
        reason: e.to_string(),
    })?;

    log::debug!(
        "Rotated {} by {} degrees ({}x{})",
        image.name(),
        image.rotation().degrees(),
        width,
        height
    );

    Ok(RenderedRaster {
        bytes: Cow::Owned(bytes),
        format: image.format(),
        width,
        height,
    })
}

/// Encode pixels as JPEG or PNG
pub fn encode(
    pixels: &DynamicImage,
    format: RasterFormat,
) -> std::result::Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    match format {
        RasterFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            match pixels {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => {
                    pixels.write_with_encoder(encoder)?
                }
                // JPEG has no alpha channel
                _ => DynamicImage::ImageRgb8(pixels.to_rgb8()).write_with_encoder(encoder)?,
            }
        }
        RasterFormat::Png => pixels.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?,
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 13) as u8, ((x + y) * 3) as u8])
        }))
    }

    #[test]
    fn test_quarter_turn_swaps_dimensions() {
        let img = gradient(40, 20);
        let rotated = rotate_pixels(&img, Rotation::Clockwise90);
        assert_eq!((rotated.width(), rotated.height()), (20, 40));

        let rotated = rotate_pixels(&img, Rotation::Clockwise270);
        assert_eq!((rotated.width(), rotated.height()), (20, 40));
    }

    #[test]
    fn test_half_turn_keeps_dimensions() {
        let img = gradient(40, 20);
        let rotated = rotate_pixels(&img, Rotation::Clockwise180);
        assert_eq!((rotated.width(), rotated.height()), (40, 20));
    }

    #[test]
    fn test_clockwise_moves_top_left_to_top_right() {
        let img = gradient(4, 2);
        let rotated = rotate_pixels(&img, Rotation::Clockwise90).to_rgb8();
        // After a clockwise quarter turn the old top-left pixel sits at the top-right
        assert_eq!(rotated.get_pixel(1, 0), img.to_rgb8().get_pixel(0, 0));
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let img = gradient(16, 16);
        let mut rotation = Rotation::None;
        let mut pixels = img.clone();
        for _ in 0..4 {
            rotation = rotation.quarter_turn();
            pixels = rotate_pixels(&pixels, Rotation::Clockwise90);
        }
        assert_eq!(rotation, Rotation::None);
        assert_eq!(pixels.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::new(8, 8));
        let bytes = encode(&rgba, RasterFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let img = gradient(12, 9);
        let bytes = encode(&img, RasterFormat::Png).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgb8(), img.to_rgb8());
    }
}
