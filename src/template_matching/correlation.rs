//! Zero-mean normalized cross-correlation
//!
//! Every placement of the template gets a score in [-1, 1] computed from
//! exact integer sums, so identical inputs always give identical surfaces.

use super::types::Region;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::find_extremes;

/// Score surface, one value per top-left placement
pub type ResponseSurface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Maximum of a response surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub score: f32,
    pub x: u32,
    pub y: u32,
}

struct TemplateStats {
    n: i128,
    sum: i128,
    sum_sq: i128,
    den: i128,
}

impl TemplateStats {
    fn new(template: &GrayImage) -> Self {
        let n = (template.width() as i128) * (template.height() as i128);
        let (mut sum, mut sum_sq) = (0i128, 0i128);
        for p in template.pixels() {
            let v = p.0[0] as i128;
            sum += v;
            sum_sq += v * v;
        }
        Self {
            n,
            sum,
            sum_sq,
            den: n * sum_sq - sum * sum,
        }
    }
}

/// Compute the full response surface
///
/// Returns `None` when the template is empty or does not fit.
pub fn response_surface(image: &GrayImage, template: &GrayImage) -> Option<ResponseSurface> {
    let (iw, ih) = image.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > iw || th > ih {
        return None;
    }

    let stats = TemplateStats::new(template);
    let out_w = iw - tw + 1;
    let out_h = ih - th + 1;
    let mut surface = ResponseSurface::new(out_w, out_h);

    for y in 0..out_h {
        for x in 0..out_w {
            let score = window_score(image, template, &stats, x, y);
            surface.put_pixel(x, y, Luma([score]));
        }
    }
    Some(surface)
}

/// Sum, sum of squares and cross sum over one placement
///
/// Each product is below 2^16, so u64 sums hold windows of up to 2^48 pixels.
fn window_sums(image: &GrayImage, template: &GrayImage, x: u32, y: u32) -> (u64, u64, u64) {
    let (mut sum_i, mut sum_i_sq, mut sum_ti) = (0u64, 0u64, 0u64);
    for dy in 0..template.height() {
        for dx in 0..template.width() {
            let i = image.get_pixel(x + dx, y + dy).0[0] as u64;
            let t = template.get_pixel(dx, dy).0[0] as u64;
            sum_i += i;
            sum_i_sq += i * i;
            sum_ti += t * i;
        }
    }
    (sum_i, sum_i_sq, sum_ti)
}

fn window_score(
    image: &GrayImage,
    template: &GrayImage,
    stats: &TemplateStats,
    x: u32,
    y: u32,
) -> f32 {
    let (sum_i, sum_i_sq, sum_ti) = window_sums(image, template, x, y);
    let (sum_i, sum_i_sq, sum_ti) = (sum_i as i128, sum_i_sq as i128, sum_ti as i128);

    let den_i = stats.n * sum_i_sq - sum_i * sum_i;
    match (stats.den == 0, den_i == 0) {
        // Two flat patches only correlate when they are the same flat value
        (true, true) => {
            if stats.sum == sum_i {
                1.0
            } else {
                0.0
            }
        }
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let num = (stats.n * sum_ti - stats.sum * sum_i) as f64;
            let den = (stats.den as f64).sqrt() * (den_i as f64).sqrt();
            (num / den).clamp(-1.0, 1.0) as f32
        }
    }
}

/// Highest score and its location, first occurrence in row-major order
pub fn best_match(image: &GrayImage, template: &GrayImage) -> Option<Peak> {
    let surface = response_surface(image, template)?;
    let extremes = find_extremes(&surface);
    let (x, y) = extremes.max_value_location;
    Some(Peak {
        score: extremes.max_value,
        x,
        y,
    })
}

/// Best match confined to `region`, location relative to the region origin
pub fn best_match_in(image: &GrayImage, template: &GrayImage, region: &Region) -> Option<Peak> {
    if region.is_empty() || region.right() > image.width() || region.bottom() > image.height() {
        return None;
    }
    let view =
        image::imageops::crop_imm(image, region.x, region.y, region.width, region.height)
            .to_image();
    best_match(&view, template)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if (x / 2 + y / 3 + x * y % 5) % 2 == 0 {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_surface_dimensions() {
        let image = checker(30, 20);
        let template = checker(5, 4);
        let surface = response_surface(&image, &template).unwrap();
        assert_eq!(surface.dimensions(), (26, 17));
    }

    #[test]
    fn test_window_sums_on_full_capture() {
        // A saturated window the size of a whole modifier capture
        let image = GrayImage::from_pixel(300, 80, Luma([255]));
        let template = checker(300, 80);
        let ones = template.pixels().filter(|p| p.0[0] == 255).count() as u64;
        let (sum_i, sum_i_sq, sum_ti) = window_sums(&image, &template, 0, 0);
        assert_eq!(sum_i, 300 * 80 * 255);
        assert_eq!(sum_i_sq, 300 * 80 * 255 * 255);
        assert_eq!(sum_ti, ones * 255 * 255);
        // Flat window against a textured template
        assert_eq!(window_score(&image, &template, &TemplateStats::new(&template), 0, 0), 0.0);
    }

    #[test]
    fn test_template_larger_than_image() {
        let image = checker(10, 10);
        let template = checker(11, 3);
        assert!(response_surface(&image, &template).is_none());
        assert!(best_match(&image, &template).is_none());
    }

    #[test]
    fn test_exact_crop_scores_one() {
        let image = checker(40, 30);
        let template = image::imageops::crop_imm(&image, 17, 9, 8, 6).to_image();
        let peak = best_match(&image, &template).unwrap();
        assert!((peak.score - 1.0).abs() < 1e-6, "score {}", peak.score);
        assert!(peak.score <= 1.0);
    }

    #[test]
    fn test_inverted_patch_scores_minus_one() {
        let template = checker(6, 6);
        let inverted = GrayImage::from_fn(6, 6, |x, y| Luma([255 - template.get_pixel(x, y).0[0]]));
        let peak = best_match(&inverted, &template).unwrap();
        assert!((peak.score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_patches() {
        let flat = GrayImage::from_pixel(4, 4, Luma([255]));
        let other_flat = GrayImage::from_pixel(4, 4, Luma([0]));
        assert_eq!(best_match(&flat, &flat).unwrap().score, 1.0);
        assert_eq!(best_match(&other_flat, &flat).unwrap().score, 0.0);
        assert_eq!(best_match(&checker(4, 4), &flat).unwrap().score, 0.0);
    }

    /// 4x4 pattern with no flat row or column
    fn marker() -> GrayImage {
        const BITS: [[u8; 4]; 4] = [[1, 0, 0, 1], [1, 1, 0, 0], [0, 1, 0, 1], [0, 0, 1, 1]];
        GrayImage::from_fn(4, 4, |x, y| Luma([BITS[y as usize][x as usize] * 255]))
    }

    #[test]
    fn test_first_maximum_wins() {
        // Two identical copies of the pattern; the upper-left one is reported
        let pattern = marker();
        let mut image = GrayImage::from_pixel(20, 8, Luma([0]));
        image::imageops::replace(&mut image, &pattern, 2, 2);
        image::imageops::replace(&mut image, &pattern, 12, 2);
        let peak = best_match(&image, &pattern).unwrap();
        assert_eq!((peak.x, peak.y), (2, 2));
        assert!((peak.score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_region_search_is_local() {
        let pattern = marker();
        let mut image = GrayImage::from_pixel(40, 30, Luma([0]));
        image::imageops::replace(&mut image, &pattern, 25, 10);
        let region = Region::new(20, 8, 20, 10);
        let peak = best_match_in(&image, &pattern, &region).unwrap();
        assert_eq!((peak.x, peak.y), (5, 2));
    }

    #[test]
    fn test_region_outside_image() {
        let image = checker(10, 10);
        let template = checker(2, 2);
        assert!(best_match_in(&image, &template, &Region::new(5, 5, 6, 2)).is_none());
        assert!(best_match_in(&image, &template, &Region::new(0, 0, 0, 2)).is_none());
    }
}
