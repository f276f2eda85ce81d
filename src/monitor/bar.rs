//! Fill estimation for vertical life and mana bars
//!
//! Strips are classified in HSV with hue on the 0-180 scale and saturation
//! and value on 0-255. A bar drains from the top, so the fill level is the
//! height below the first colored row.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};
use std::fmt;

const MIN_HEIGHT: u32 = 10;
const MIN_WIDTH: u32 = 3;
const VALID_FRACTION: f64 = 0.1;

/// Which bar a strip shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    /// Red or green
    Life,
    /// Blue
    Mana,
}

impl fmt::Display for BarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarKind::Life => f.write_str("HP"),
            BarKind::Mana => f.write_str("MP"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// 8-bit RGB to HSV with hue halved into 0..=180
pub fn to_hsv(Rgb([r, g, b]): Rgb<u8>) -> Hsv {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max > 0.0 { diff * 255.0 / max } else { 0.0 };
    let mut h = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    Hsv {
        h: (h / 2.0).round().min(180.0) as u8,
        s: s.round() as u8,
        v: max as u8,
    }
}

/// Inclusive hue window with saturation and value floors
#[derive(Debug, Clone, Copy)]
struct HueBand {
    low: u8,
    high: u8,
}

impl HueBand {
    const fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }
}

struct ColorRule {
    bands: &'static [HueBand],
    min_s: u8,
    min_v: u8,
}

impl ColorRule {
    fn accepts(&self, hsv: Hsv) -> bool {
        hsv.s >= self.min_s
            && hsv.v >= self.min_v
            && self.bands.iter().any(|b| (b.low..=b.high).contains(&hsv.h))
    }
}

const LIFE_FILL: ColorRule = ColorRule {
    bands: &[HueBand::new(0, 20), HueBand::new(160, 180), HueBand::new(40, 80)],
    min_s: 70,
    min_v: 60,
};

const MANA_FILL: ColorRule = ColorRule {
    bands: &[HueBand::new(90, 140)],
    min_s: 70,
    min_v: 60,
};

const LIFE_VALID: ColorRule = ColorRule {
    bands: &[HueBand::new(0, 25), HueBand::new(150, 180), HueBand::new(40, 80)],
    min_s: 50,
    min_v: 40,
};

const MANA_VALID: ColorRule = ColorRule {
    bands: &[HueBand::new(80, 150)],
    min_s: 50,
    min_v: 40,
};

impl BarKind {
    fn fill_rule(self) -> &'static ColorRule {
        match self {
            BarKind::Life => &LIFE_FILL,
            BarKind::Mana => &MANA_FILL,
        }
    }

    fn valid_rule(self) -> &'static ColorRule {
        match self {
            BarKind::Life => &LIFE_VALID,
            BarKind::Mana => &MANA_VALID,
        }
    }
}

fn mask(strip: &RgbImage, rule: &ColorRule) -> GrayImage {
    GrayImage::from_fn(strip.width(), strip.height(), |x, y| {
        if rule.accepts(to_hsv(*strip.get_pixel(x, y))) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Whether enough of the strip has the bar's color to be trusted
pub fn is_valid_bar(strip: &RgbImage, kind: BarKind) -> bool {
    let total = strip.width() as u64 * strip.height() as u64;
    if total == 0 {
        return false;
    }
    let rule = kind.valid_rule();
    let colored = strip.pixels().filter(|p| rule.accepts(to_hsv(**p))).count() as u64;
    colored as f64 / total as f64 > VALID_FRACTION
}

/// Fill level in percent, `None` for strips too small to measure
pub fn fill_percentage(strip: &RgbImage, kind: BarKind) -> Option<f32> {
    if strip.height() < MIN_HEIGHT || strip.width() < MIN_WIDTH {
        return None;
    }
    let raw = mask(strip, kind.fill_rule());
    let cleaned = open(&close(&raw, Norm::LInf, 1), Norm::LInf, 1);

    let height = cleaned.height();
    let first_row = (0..height).find(|&y| (0..cleaned.width()).any(|x| cleaned.get_pixel(x, y)[0] > 0));
    let Some(top) = first_row else {
        return Some(0.0);
    };
    let filled = (height - top) as f32 / height as f32 * 100.0;
    Some(filled.clamp(0.0, 100.0))
}

/// Validity check followed by estimation; `None` when the strip is not a bar
pub fn read_bar(strip: &RgbImage, kind: BarKind) -> Option<f32> {
    if !is_valid_bar(strip, kind) {
        return None;
    }
    fill_percentage(strip, kind)
}
