//! Attempt verdict

use super::types::{MatchThresholds, PrimarySelection, TierOutcome, TierRejection};

/// Identity score for a tier stage that never searched anything
pub const UNSEARCHED_TIER_SCORE: f32 = 0.0;

/// Terminal state of one attempt's pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    NoPrimaryMatch,
    RegionInvalid(TierRejection),
    TierSearched,
}

/// Outcome of one attempt with everything needed for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub success: bool,
    pub primary: PrimarySelection,
    pub primary_passed: bool,
    pub tier: TierOutcome,
    pub tier_passed: bool,
    pub thresholds: MatchThresholds,
}

/// Combine the two stage scores into a pass/fail decision
///
/// A missing primary never passes. A missing tier score counts as
/// [`UNSEARCHED_TIER_SCORE`].
pub fn combine(
    primary_score: Option<f32>,
    tier_score: Option<f32>,
    thresholds: &MatchThresholds,
) -> (bool, bool) {
    let primary_passed = primary_score.is_some_and(|s| s >= thresholds.primary);
    let tier_passed = tier_score.unwrap_or(UNSEARCHED_TIER_SCORE) >= thresholds.tier;
    (primary_passed, tier_passed)
}

impl Verdict {
    pub fn new(primary: PrimarySelection, tier: TierOutcome, thresholds: MatchThresholds) -> Self {
        let primary_score = primary.selected.as_ref().map(|m| m.score);
        let (primary_passed, tier_passed) = combine(primary_score, tier.score(), &thresholds);
        Self {
            success: primary_passed && tier_passed,
            primary,
            primary_passed,
            tier,
            tier_passed,
            thresholds,
        }
    }

    pub fn stage(&self) -> AttemptStage {
        match &self.tier {
            TierOutcome::NotSearched => AttemptStage::NoPrimaryMatch,
            TierOutcome::Rejected(reason) => AttemptStage::RegionInvalid(*reason),
            TierOutcome::Searched(_) => AttemptStage::TierSearched,
        }
    }

    /// Primary score of the selected template, if any
    pub fn primary_score(&self) -> Option<f32> {
        self.primary.selected.as_ref().map(|m| m.score)
    }

    /// Tier score if the tier search actually ran
    pub fn tier_score(&self) -> Option<f32> {
        self.tier.score()
    }
}
