//! Desktop collaborator types and traits

use crate::error::{ReforgeError, ReforgeResult};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute screen coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for ScreenPoint {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<ScreenPoint> for [i32; 2] {
    fn from(p: ScreenPoint) -> Self {
        [p.x, p.y]
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Absolute screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 4]", into = "[i64; 4]")]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<[i64; 4]> for ScreenRect {
    fn from([x, y, w, h]: [i64; 4]) -> Self {
        Self {
            x: x.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            y: y.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            width: w.clamp(0, u32::MAX as i64) as u32,
            height: h.clamp(0, u32::MAX as i64) as u32,
        }
    }
}

impl From<ScreenRect> for [i64; 4] {
    fn from(r: ScreenRect) -> Self {
        [r.x as i64, r.y as i64, r.width as i64, r.height as i64]
    }
}

impl fmt::Display for ScreenRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// Keys the automation presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Shift,
    Alt,
    Char(char),
}

impl InputKey {
    /// Parse a configured key name such as `"1"`, `"q"`, `"shift"` or `"alt"`
    pub fn parse(name: &str) -> ReforgeResult<Self> {
        let trimmed = name.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "shift" => Ok(InputKey::Shift),
            "alt" => Ok(InputKey::Alt),
            lower => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(InputKey::Char(c)),
                    _ => Err(ReforgeError::invalid_config(format!(
                        "unsupported key name '{trimmed}'"
                    ))),
                }
            }
        }
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKey::Shift => f.write_str("shift"),
            InputKey::Alt => f.write_str("alt"),
            InputKey::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Screen capture provider
pub trait ScreenCapture {
    /// Capture `rect` as a color image of exactly its size
    fn capture(&self, rect: &ScreenRect) -> ReforgeResult<RgbImage>;
}

/// Mouse and keyboard injector
pub trait InputInjector {
    fn move_to(&mut self, point: ScreenPoint) -> ReforgeResult<()>;
    fn left_click(&mut self) -> ReforgeResult<()>;
    fn right_click(&mut self) -> ReforgeResult<()>;
    fn key_down(&mut self, key: InputKey) -> ReforgeResult<()>;
    fn key_up(&mut self, key: InputKey) -> ReforgeResult<()>;

    fn key_press(&mut self, key: InputKey) -> ReforgeResult<()> {
        self.key_down(key)?;
        self.key_up(key)
    }
}

/// Reject a capture whose size differs from the requested rectangle
pub fn ensure_capture_size(rect: &ScreenRect, image: &RgbImage) -> ReforgeResult<()> {
    if image.width() != rect.width || image.height() != rect.height {
        return Err(ReforgeError::CaptureSizeMismatch {
            expected_width: rect.width,
            expected_height: rect.height,
            actual_width: image.width(),
            actual_height: image.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(InputKey::parse("1").unwrap(), InputKey::Char('1'));
        assert_eq!(InputKey::parse(" Q ").unwrap(), InputKey::Char('q'));
        assert_eq!(InputKey::parse("Shift").unwrap(), InputKey::Shift);
        assert_eq!(InputKey::parse("alt").unwrap(), InputKey::Alt);
        assert!(InputKey::parse("").is_err());
        assert!(InputKey::parse("f13").is_err());
    }

    #[test]
    fn test_rect_serializes_as_array() {
        let rect = ScreenRect::new(10, -20, 300, 80);
        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(json, "[10,-20,300,80]");
        let back: ScreenRect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }

    #[test]
    fn test_capture_size_check() {
        let rect = ScreenRect::new(0, 0, 4, 3);
        assert!(ensure_capture_size(&rect, &RgbImage::new(4, 3)).is_ok());
        assert!(matches!(
            ensure_capture_size(&rect, &RgbImage::new(3, 4)),
            Err(ReforgeError::CaptureSizeMismatch { .. })
        ));
    }
}
