//! Synthetic captures shared by tests

use crate::template_matching::Template;
use image::{DynamicImage, Rgb, RgbImage};

pub const DARK: Rgb<u8> = Rgb([25, 20, 30]);
pub const BRIGHT: Rgb<u8> = Rgb([230, 200, 120]);

/// Deterministic pseudo-random bit per pixel
pub fn noise(x: u32, y: u32, seed: u32) -> bool {
    let mut h = x.wrapping_mul(0x9E37_79B1)
        ^ y.wrapping_mul(0x85EB_CA77)
        ^ seed.wrapping_mul(0xC2B2_AE3D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^= h >> 15;
    h & 1 == 1
}

pub fn noise_rgb(width: u32, height: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if noise(x, y, seed) { BRIGHT } else { DARK }
    })
}

pub fn color_template(name: &str, image: &RgbImage) -> Template {
    Template::from_image(name, &DynamicImage::ImageRgb8(image.clone())).unwrap()
}

/// 300x80 capture with modifier A at (20, 30) and the tier icon at (140, 32)
pub struct Scene {
    pub capture: RgbImage,
    pub modifier_a: RgbImage,
    pub modifier_b: RgbImage,
    pub tier_icon: RgbImage,
}

pub fn scene() -> Scene {
    let modifier_a = noise_rgb(60, 16, 1);
    // B shares A's layout with every seventh pixel flipped
    let modifier_b = RgbImage::from_fn(60, 16, |x, y| {
        let on = noise(x, y, 1) ^ ((x + y * 60) % 7 == 0);
        if on { BRIGHT } else { DARK }
    });
    let tier_icon = noise_rgb(12, 12, 7);

    let mut capture = RgbImage::from_pixel(300, 80, DARK);
    image::imageops::replace(&mut capture, &modifier_a, 20, 30);
    image::imageops::replace(&mut capture, &tier_icon, 140, 32);

    Scene {
        capture,
        modifier_a,
        modifier_b,
        tier_icon,
    }
}
