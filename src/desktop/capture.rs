//! Screen capture through xcap

use super::types::{ScreenCapture, ScreenRect, ensure_capture_size};
use crate::error::{ReforgeError, ReforgeResult};
use image::{DynamicImage, RgbImage, RgbaImage};

/// Captures rectangles from the monitor that contains their origin
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopCapture;

impl DesktopCapture {
    pub fn new() -> Self {
        Self
    }
}

fn capture_error(rect: &ScreenRect, reason: impl ToString) -> ReforgeError {
    ReforgeError::Capture {
        region: rect.to_string(),
        reason: reason.to_string(),
    }
}

impl ScreenCapture for DesktopCapture {
    fn capture(&self, rect: &ScreenRect) -> ReforgeResult<RgbImage> {
        if rect.is_empty() {
            return Err(ReforgeError::InvalidRegion {
                name: rect.to_string(),
                width: rect.width,
                height: rect.height,
            });
        }

        let monitor =
            xcap::Monitor::from_point(rect.x, rect.y).map_err(|e| capture_error(rect, e))?;
        let origin_x = monitor.x().map_err(|e| capture_error(rect, e))?;
        let origin_y = monitor.y().map_err(|e| capture_error(rect, e))?;
        let shot = monitor.capture_image().map_err(|e| capture_error(rect, e))?;

        // Rebuild as this crate's image type
        let (width, height) = (shot.width(), shot.height());
        let screen = RgbaImage::from_raw(width, height, shot.into_raw())
            .ok_or_else(|| capture_error(rect, "monitor returned a malformed buffer"))?;

        let local_x = rect.x - origin_x;
        let local_y = rect.y - origin_y;
        if local_x < 0
            || local_y < 0
            || local_x as u64 + rect.width as u64 > width as u64
            || local_y as u64 + rect.height as u64 > height as u64
        {
            return Err(capture_error(
                rect,
                format!("outside the {}x{} monitor at ({}, {})", width, height, origin_x, origin_y),
            ));
        }

        let cropped = image::imageops::crop_imm(
            &screen,
            local_x as u32,
            local_y as u32,
            rect.width,
            rect.height,
        )
        .to_image();
        let rgb = DynamicImage::ImageRgba8(cropped).to_rgb8();
        ensure_capture_size(rect, &rgb)?;
        log::trace!("Captured {}", rect);
        Ok(rgb)
    }
}
