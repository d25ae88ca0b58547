//! Screenshot cropping and trimming.

use std::io::Cursor;

use {
    image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgba},
    tracing::debug,
};

use crate::error::{MediaError, Result};

/// The page background captured screenshots are trimmed against.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A rectangular capture region in unscaled CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Decode a screenshot byte buffer.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| MediaError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| MediaError::Decode(e.to_string()))
}

/// Encode an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| MediaError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Crop a full-page screenshot to an element region.
///
/// The region comes from the page in CSS pixels while the screenshot was
/// captured at `zoom` magnification, so every coordinate is scaled before
/// the fixed `pad` margin is applied. Edges are clamped to the image.
pub fn crop_region(img: &DynamicImage, region: Region, zoom: f64, pad: u32) -> Result<DynamicImage> {
    let (img_w, img_h) = img.dimensions();
    let pad = f64::from(pad);

    let left = (region.x * zoom - pad).max(0.0) as u32;
    let top = (region.y * zoom - pad).max(0.0) as u32;
    let right = (((region.x + region.width) * zoom + pad) as u32).min(img_w);
    let bottom = (((region.y + region.height) * zoom + pad) as u32).min(img_h);

    if right <= left || bottom <= top {
        return Err(MediaError::EmptyRegion(format!(
            "{}x{} at ({left}, {top})",
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )));
    }

    debug!(left, top, right, bottom, "cropping capture region");
    Ok(img.crop_imm(left, top, right - left, bottom - top))
}

/// Trim trailing background columns off the right edge.
///
/// Scans columns right to left for the last one containing any
/// non-background pixel and crops the image to that column plus `pad`.
/// An image that is background everywhere fails with
/// [`MediaError::BlankCapture`] — the capture most likely missed the
/// rendered element entirely.
pub fn trim_trailing(img: &DynamicImage, background: Rgba<u8>, pad: u32) -> Result<DynamicImage> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let last_content_column = (0..width)
        .rev()
        .find(|&x| (0..height).any(|y| *rgba.get_pixel(x, y) != background));

    let Some(x) = last_content_column else {
        return Err(MediaError::BlankCapture);
    };

    let new_width = (x + pad).min(width);
    debug!(content_end = x, new_width, "trimming trailing whitespace");
    Ok(img.crop_imm(0, 0, new_width, height))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, BACKGROUND)
    }

    #[test]
    fn trim_crops_to_last_content_column_plus_pad() {
        let mut img = blank(100, 40);
        img.put_pixel(40, 7, Rgba([0, 0, 0, 255]));
        let trimmed = trim_trailing(&DynamicImage::ImageRgba8(img), BACKGROUND, 15).unwrap();
        assert_eq!(trimmed.dimensions(), (55, 40));
    }

    #[test]
    fn trim_pad_is_clamped_to_image_width() {
        let mut img = blank(50, 10);
        img.put_pixel(48, 3, Rgba([10, 20, 30, 255]));
        let trimmed = trim_trailing(&DynamicImage::ImageRgba8(img), BACKGROUND, 15).unwrap();
        assert_eq!(trimmed.dimensions(), (50, 10));
    }

    #[test]
    fn all_background_is_a_blank_capture() {
        let img = DynamicImage::ImageRgba8(blank(64, 64));
        assert!(matches!(
            trim_trailing(&img, BACKGROUND, 15),
            Err(MediaError::BlankCapture)
        ));
    }

    #[test]
    fn crop_region_scales_and_pads() {
        let img = DynamicImage::ImageRgba8(blank(300, 300));
        let region = Region {
            x: 20.0,
            y: 10.0,
            width: 50.0,
            height: 30.0,
        };
        let cropped = crop_region(&img, region, 2.0, 5).unwrap();
        // (20*2 - 5 .. 70*2 + 5) x (10*2 - 5 .. 40*2 + 5)
        assert_eq!(cropped.dimensions(), (110, 70));
    }

    #[test]
    fn crop_region_clamps_to_image_edges() {
        let img = DynamicImage::ImageRgba8(blank(100, 100));
        let region = Region {
            x: 0.0,
            y: 0.0,
            width: 500.0,
            height: 500.0,
        };
        let cropped = crop_region(&img, region, 1.0, 10).unwrap();
        assert_eq!(cropped.dimensions(), (100, 100));
    }

    #[test]
    fn crop_region_off_image_is_empty() {
        let img = DynamicImage::ImageRgba8(blank(100, 100));
        let region = Region {
            x: 500.0,
            y: 500.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(crop_region(&img, region, 1.0, 0).is_err());
    }

    #[test]
    fn png_round_trip() {
        let mut img = blank(8, 8);
        img.put_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let encoded = encode_png(&DynamicImage::ImageRgba8(img)).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(decoded.to_rgba8().get_pixel(2, 2), &Rgba([255, 0, 0, 255]));
    }
}
