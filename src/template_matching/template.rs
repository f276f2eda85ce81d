//! Template loading
//!
//! Templates are decoded once at the start of a run and binarized the same
//! way live captures are.

use super::binarize::binarize;
use crate::error::{ReforgeError, ReforgeResult};
use image::{DynamicImage, GrayImage};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// File stem, or the name given to an in-memory template
    pub name: String,
    pub path: Option<PathBuf>,
    /// Binarized pixels
    pub image: GrayImage,
}

impl Template {
    /// Load and binarize a template from disk
    pub fn load(path: impl AsRef<Path>) -> ReforgeResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ReforgeError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }

        let decoded = image::open(path).map_err(|source| ReforgeError::TemplateDecode {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut template = Self::from_image(name, &decoded)?;
        template.path = Some(path.to_path_buf());
        log::debug!(
            "Loaded template '{}' ({}x{}) from {}",
            template.name,
            template.width(),
            template.height(),
            path.display()
        );
        Ok(template)
    }

    /// Load an ordered list of templates, failing on the first bad path
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> ReforgeResult<Vec<Self>> {
        paths.iter().map(|p| Self::load(p)).collect()
    }

    /// Binarize an already decoded image
    pub fn from_image(name: impl Into<String>, image: &DynamicImage) -> ReforgeResult<Self> {
        Ok(Self {
            name: name.into(),
            path: None,
            image: binarize(image)?,
        })
    }

    /// Wrap an image that is already two-tone
    pub fn from_binarized(name: impl Into<String>, image: GrayImage) -> Self {
        Self {
            name: name.into(),
            path: None,
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the template fits inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width() <= width && self.height() <= height
    }
}
