//! Capture source backed by a saved screenshot

use super::types::{ScreenCapture, ScreenPoint, ScreenRect};
use crate::error::{ReforgeError, ReforgeResult};
use image::RgbImage;
use std::path::Path;

/// Serves crops of a fixed image placed at `origin` on a virtual screen
#[derive(Debug, Clone)]
pub struct StillCapture {
    image: RgbImage,
    origin: ScreenPoint,
}

impl StillCapture {
    pub fn new(image: RgbImage, origin: ScreenPoint) -> Self {
        Self { image, origin }
    }

    /// Load a screenshot file, placed at the screen origin
    pub fn open(path: impl AsRef<Path>) -> ReforgeResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| ReforgeError::ImageDecode {
            description: format!("{}: {}", path.display(), e),
        })?;
        Ok(Self::new(image.to_rgb8(), ScreenPoint::new(0, 0)))
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Rectangle covering the whole image
    pub fn full_rect(&self) -> ScreenRect {
        ScreenRect::new(
            self.origin.x,
            self.origin.y,
            self.image.width(),
            self.image.height(),
        )
    }

    pub fn contains(&self, rect: &ScreenRect) -> bool {
        let x = rect.x as i64 - self.origin.x as i64;
        let y = rect.y as i64 - self.origin.y as i64;
        x >= 0
            && y >= 0
            && x + rect.width as i64 <= self.image.width() as i64
            && y + rect.height as i64 <= self.image.height() as i64
    }
}

impl ScreenCapture for StillCapture {
    fn capture(&self, rect: &ScreenRect) -> ReforgeResult<RgbImage> {
        if rect.is_empty() || !self.contains(rect) {
            return Err(ReforgeError::Capture {
                region: rect.to_string(),
                reason: format!(
                    "outside the {}x{} still image at {}",
                    self.image.width(),
                    self.image.height(),
                    self.origin
                ),
            });
        }
        let x = (rect.x - self.origin.x) as u32;
        let y = (rect.y - self.origin.y) as u32;
        Ok(image::imageops::crop_imm(&self.image, x, y, rect.width, rect.height).to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient() -> RgbImage {
        RgbImage::from_fn(50, 40, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn test_crop_with_origin() {
        let still = StillCapture::new(gradient(), ScreenPoint::new(100, 200));
        let crop = still.capture(&ScreenRect::new(110, 205, 5, 4)).unwrap();
        assert_eq!(crop.dimensions(), (5, 4));
        assert_eq!(crop.get_pixel(0, 0), &Rgb([10, 5, 0]));
    }

    #[test]
    fn test_outside_is_capture_error() {
        let still = StillCapture::new(gradient(), ScreenPoint::new(0, 0));
        let err = still.capture(&ScreenRect::new(45, 0, 10, 10)).unwrap_err();
        assert!(err.is_transient());
        assert!(still.capture(&ScreenRect::new(-1, 0, 2, 2)).is_err());
    }

    #[test]
    fn test_full_rect() {
        let still = StillCapture::new(gradient(), ScreenPoint::new(3, 4));
        assert_eq!(still.full_rect(), ScreenRect::new(3, 4, 50, 40));
        assert!(still.capture(&still.full_rect()).is_ok());
    }
}
