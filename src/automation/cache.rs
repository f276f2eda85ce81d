//! Annotated result images, newest N kept on disk

use crate::error::{ReforgeError, ReforgeResult};
use crate::template_matching::{Region, TierOutcome, Verdict};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const CACHE_PREFIX: &str = "equip_mods";

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);

fn outline(image: &mut RgbImage, region: &Region, color: Rgb<u8>) {
    if region.is_empty() {
        return;
    }
    draw_hollow_rect_mut(
        image,
        Rect::at(region.x as i32, region.y as i32).of_size(region.width, region.height),
        color,
    );
    // Second pass one pixel inside for a 2px line
    if region.width > 2 && region.height > 2 {
        draw_hollow_rect_mut(
            image,
            Rect::at(region.x as i32 + 1, region.y as i32 + 1)
                .of_size(region.width - 2, region.height - 2),
            color,
        );
    }
}

/// Draw the primary match in green and the tier match in green or red
pub fn annotate(capture: &RgbImage, verdict: &Verdict) -> RgbImage {
    let mut out = capture.clone();
    if let Some(primary) = &verdict.primary.selected {
        outline(&mut out, &primary.bounding_box(), GREEN);
    }
    if let TierOutcome::Searched(tier) = &verdict.tier {
        let color = if verdict.tier_passed { GREEN } else { RED };
        outline(&mut out, &tier.result.bounding_box(), color);
    }
    out
}

/// Rolling directory of annotated captures
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
    keep: usize,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            dir: dir.into(),
            keep: keep.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn io_error(&self, e: impl ToString) -> ReforgeError {
        ReforgeError::CacheIo {
            path: self.dir.clone(),
            description: e.to_string(),
        }
    }

    /// Save an annotated capture and prune older entries
    pub fn store(&self, capture: &RgbImage, verdict: &Verdict) -> ReforgeResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(e))?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%6f");
        let path = self.dir.join(format!("{CACHE_PREFIX}_{stamp}.png"));
        annotate(capture, verdict)
            .save(&path)
            .map_err(|e| self.io_error(e))?;
        log::debug!("Cached attempt image at {}", path.display());
        self.prune()?;
        Ok(path)
    }

    /// Cached files, oldest first
    pub fn entries(&self) -> ReforgeResult<Vec<PathBuf>> {
        let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| self.io_error(e))? {
            let entry = entry.map_err(|e| self.io_error(e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(CACHE_PREFIX) || !name.ends_with(".png") {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, entry.path()));
        }
        files.sort();
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    fn prune(&self) -> ReforgeResult<()> {
        let entries = self.entries()?;
        let excess = entries.len().saturating_sub(self.keep);
        for old in entries.into_iter().take(excess) {
            if let Err(e) = fs::remove_file(&old) {
                log::warn!("Could not remove old cache file {}: {}", old.display(), e);
            } else {
                log::debug!("Removed old cache file {}", old.display());
            }
        }
        Ok(())
    }
}
