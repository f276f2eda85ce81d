//! Template matching decision engine
//!
//! This module provides the per-attempt pipeline:
//! - Otsu binarization of captures and templates
//! - Normalized cross-correlation search for the primary modifier
//! - Tier icon search in the strip to the right of the primary match
//! - A verdict combining both stages with their scores and locations

pub mod binarize;
pub mod correlation;
pub mod matcher;
pub mod selector;
pub mod template;
pub mod tier;
pub mod types;
pub mod verdict;

pub use binarize::{binarize, binarize_gray, binarize_rgb};
pub use matcher::TemplateMatcher;
pub use selector::select_primary;
pub use template::Template;
pub use tier::{locate_tier_region, match_tier, search_tier};
pub use types::{
    CandidateScore, MatchResult, MatchThresholds, PrimarySelection, Region, TierMatch,
    TierOutcome, TierRejection,
};
pub use verdict::{AttemptStage, Verdict};

#[cfg(test)]
pub(crate) mod fixtures;
