//! Template matching pipeline
//!
//! Binarize, select the primary template, search the tier strip, combine.

use super::binarize::binarize_rgb;
use super::selector::select_primary;
use super::template::Template;
use super::tier::search_tier;
use super::types::{MatchThresholds, TierOutcome};
use super::verdict::Verdict;
use crate::error::{ReforgeError, ReforgeResult};
use image::{GrayImage, RgbImage};
use std::path::Path;

/// Read-only matching engine for one run
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    primaries: Vec<Template>,
    tier: Template,
    thresholds: MatchThresholds,
}

impl TemplateMatcher {
    /// Create a matcher from already loaded templates
    pub fn new(
        primaries: Vec<Template>,
        tier: Template,
        thresholds: MatchThresholds,
    ) -> ReforgeResult<Self> {
        for (label, value) in [("primary", thresholds.primary), ("tier", thresholds.tier)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ReforgeError::invalid_config(format!(
                    "{label} threshold {value} is outside [0, 1]"
                )));
            }
        }
        if primaries.is_empty() {
            return Err(ReforgeError::invalid_config("no primary templates configured"));
        }
        Ok(Self {
            primaries,
            tier,
            thresholds,
        })
    }

    /// Load every template from disk, in order
    pub fn from_paths<P: AsRef<Path>>(
        primary_paths: &[P],
        tier_path: impl AsRef<Path>,
        thresholds: MatchThresholds,
    ) -> ReforgeResult<Self> {
        let primaries = Template::load_all(primary_paths)?;
        let tier = Template::load(tier_path)?;
        log::info!(
            "Loaded {} primary template(s) and tier template '{}'",
            primaries.len(),
            tier.name
        );
        Self::new(primaries, tier, thresholds)
    }

    pub fn primaries(&self) -> &[Template] {
        &self.primaries
    }

    pub fn tier(&self) -> &Template {
        &self.tier
    }

    pub fn thresholds(&self) -> MatchThresholds {
        self.thresholds
    }

    /// Reject captures that can never produce a match
    pub fn validate_for_capture(&self, width: u32, height: u32) -> ReforgeResult<()> {
        if width == 0 || height == 0 {
            return Err(ReforgeError::InvalidRegion {
                name: "capture".to_string(),
                width,
                height,
            });
        }

        let usable = self
            .primaries
            .iter()
            .filter(|t| t.fits_within(width, height))
            .count();
        if usable == 0 {
            return Err(ReforgeError::NoUsableTemplates { width, height });
        }
        if usable < self.primaries.len() {
            log::warn!(
                "{} of {} primary template(s) are larger than the {}x{} capture and will be skipped",
                self.primaries.len() - usable,
                self.primaries.len(),
                width,
                height
            );
        }

        if !self.tier.fits_within(width, height) {
            return Err(ReforgeError::TierTemplateTooLarge {
                name: self.tier.name.clone(),
                template_width: self.tier.width(),
                template_height: self.tier.height(),
                width,
                height,
            });
        }
        Ok(())
    }

    /// Evaluate an already binarized screenshot
    pub fn evaluate(&self, screenshot: &GrayImage) -> Verdict {
        let primary = select_primary(screenshot, &self.primaries, self.thresholds.primary);
        let tier = match &primary.selected {
            Some(selected) => search_tier(screenshot, selected, &self.tier),
            None => TierOutcome::NotSearched,
        };
        Verdict::new(primary, tier, self.thresholds)
    }

    /// Binarize a raw color capture and evaluate it
    pub fn evaluate_capture(&self, capture: &RgbImage) -> ReforgeResult<Verdict> {
        let binarized = binarize_rgb(capture)?;
        Ok(self.evaluate(&binarized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn template(name: &str, width: u32, height: u32) -> Template {
        Template::from_binarized(
            name,
            GrayImage::from_fn(width, height, |x, y| Luma([if (x + y) % 3 == 0 { 255 } else { 0 }])),
        )
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let err = TemplateMatcher::new(
            vec![template("a", 4, 4)],
            template("tier", 2, 2),
            MatchThresholds {
                primary: 1.2,
                tier: 0.9,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ReforgeError::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_empty_template_list() {
        let err = TemplateMatcher::new(vec![], template("tier", 2, 2), MatchThresholds::default())
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_validate_for_capture() {
        let matcher = TemplateMatcher::new(
            vec![template("wide", 40, 4), template("small", 8, 4)],
            template("tier", 5, 5),
            MatchThresholds::default(),
        )
        .unwrap();

        assert!(matches!(
            matcher.validate_for_capture(0, 10),
            Err(ReforgeError::InvalidRegion { .. })
        ));
        assert!(matches!(
            matcher.validate_for_capture(6, 10),
            Err(ReforgeError::NoUsableTemplates { .. })
        ));
        assert!(matches!(
            matcher.validate_for_capture(20, 4),
            Err(ReforgeError::TierTemplateTooLarge { .. })
        ));
        // One oversized primary is only a warning
        assert!(matcher.validate_for_capture(20, 10).is_ok());
    }

    #[test]
    fn test_no_primary_match_skips_tier() {
        let matcher = TemplateMatcher::new(
            vec![template("a", 4, 4)],
            template("tier", 2, 2),
            MatchThresholds::default(),
        )
        .unwrap();
        let blank = GrayImage::from_pixel(20, 10, Luma([0]));
        let verdict = matcher.evaluate(&blank);
        assert!(!verdict.success);
        assert_eq!(verdict.tier, TierOutcome::NotSearched);
    }
}
