//! Two-tone conversion shared by captures and templates
//!
//! Grayscale uses the BT.601 luma weights, then a global Otsu level splits
//! the pixels: values above the level become 255, the rest 0.

use crate::error::{ReforgeError, ReforgeResult};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::contrast::otsu_level;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Binarize any decoded image
pub fn binarize(image: &DynamicImage) -> ReforgeResult<GrayImage> {
    match image {
        DynamicImage::ImageLuma8(gray) => binarize_gray(gray),
        other => binarize_rgb(&other.to_rgb8()),
    }
}

/// Binarize a color capture
pub fn binarize_rgb(image: &RgbImage) -> ReforgeResult<GrayImage> {
    ensure_not_empty(image.width(), image.height())?;
    binarize_gray(&to_luma_bt601(image))
}

/// Binarize a grayscale image
pub fn binarize_gray(gray: &GrayImage) -> ReforgeResult<GrayImage> {
    ensure_not_empty(gray.width(), gray.height())?;
    let level = otsu_level(gray);
    log::trace!(
        "Otsu level {} for {}x{} image",
        level,
        gray.width(),
        gray.height()
    );
    Ok(split_at(gray, level))
}

/// Luma with 0.299/0.587/0.114 weights, rounded
pub fn to_luma_bt601(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

fn split_at(gray: &GrayImage, level: u8) -> GrayImage {
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
    out
}

fn ensure_not_empty(width: u32, height: u32) -> ReforgeResult<()> {
    if width == 0 || height == 0 {
        return Err(ReforgeError::ImageDecode {
            description: format!("image is empty ({}x{})", width, height),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_tone_rgb() -> RgbImage {
        RgbImage::from_fn(20, 10, |x, _| {
            if x < 8 {
                Rgb([30, 40, 50])
            } else {
                Rgb([220, 210, 200])
            }
        })
    }

    #[test]
    fn test_output_is_two_tone_and_same_size() {
        let bin = binarize_rgb(&two_tone_rgb()).unwrap();
        assert_eq!(bin.dimensions(), (20, 10));
        assert!(
            bin.pixels()
                .all(|p| p.0[0] == FOREGROUND || p.0[0] == BACKGROUND)
        );
        assert_eq!(bin.get_pixel(0, 0).0[0], BACKGROUND);
        assert_eq!(bin.get_pixel(19, 9).0[0], FOREGROUND);
    }

    #[test]
    fn test_idempotent() {
        let once = binarize_rgb(&two_tone_rgb()).unwrap();
        let twice = binarize_gray(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_uniform_image_is_stable() {
        let white = GrayImage::from_pixel(5, 5, Luma([255]));
        assert_eq!(binarize_gray(&white).unwrap(), white);
        let black = GrayImage::from_pixel(5, 5, Luma([0]));
        assert_eq!(binarize_gray(&black).unwrap(), black);
    }

    #[test]
    fn test_empty_image_fails() {
        let empty = RgbImage::new(0, 4);
        assert!(matches!(
            binarize_rgb(&empty),
            Err(ReforgeError::ImageDecode { .. })
        ));
    }

    #[test]
    fn test_luma_weights() {
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        assert_eq!(to_luma_bt601(&img).get_pixel(0, 0).0[0], 76);
        let img = RgbImage::from_pixel(1, 1, Rgb([0, 255, 0]));
        assert_eq!(to_luma_bt601(&img).get_pixel(0, 0).0[0], 150);
    }
}
