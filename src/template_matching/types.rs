//! Template matching data types

use std::fmt;

/// Rectangle in pixel coordinates of a captured image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole image of the given size
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether a `width` x `height` block fits inside this region
    pub fn can_hold(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// Acceptance thresholds for the two matching passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    pub primary: f32,
    pub tier: f32,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            primary: 0.85,
            tier: 0.90,
        }
    }
}

/// Best location of one template inside a searched image
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Template name
    pub template: String,
    /// Normalized correlation score in [-1, 1]
    pub score: f32,
    /// Top-left X in capture coordinates
    pub x: u32,
    /// Top-left Y in capture coordinates
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl MatchResult {
    /// Bounding box of the matched template
    pub fn bounding_box(&self) -> Region {
        Region::new(self.x, self.y, self.width, self.height)
    }

    pub fn passes(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

/// Score of a single primary candidate, in template order
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub template: String,
    /// `None` when the template was larger than the screenshot and skipped
    pub score: Option<f32>,
    pub passed: bool,
}

/// Output of the primary-match selector
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimarySelection {
    pub candidates: Vec<CandidateScore>,
    /// Index of the selected template in the input order
    pub selected_index: Option<usize>,
    pub selected: Option<MatchResult>,
}

impl PrimarySelection {
    pub fn is_match(&self) -> bool {
        self.selected.is_some()
    }

    /// Best score among evaluated candidates, whether or not it passed
    pub fn best_score(&self) -> Option<f32> {
        self.candidates
            .iter()
            .filter_map(|c| c.score)
            .fold(None, |best: Option<f32>, s| match best {
                Some(b) if b >= s => Some(b),
                _ => Some(s),
            })
    }
}

/// Why a tier search region could not be derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierRejection {
    NoRoomToRight,
    PrimaryOutOfBounds,
    TierTemplateTooLarge,
}

impl fmt::Display for TierRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TierRejection::NoRoomToRight => "no room to the right",
            TierRejection::PrimaryOutOfBounds => "primary match out of bounds",
            TierRejection::TierTemplateTooLarge => "tier template larger than available region",
        };
        f.write_str(reason)
    }
}

/// Tier search that actually ran
#[derive(Debug, Clone, PartialEq)]
pub struct TierMatch {
    /// Match in capture coordinates
    pub result: MatchResult,
    /// Region the search was confined to
    pub search_region: Region,
    /// Offset of the match inside `search_region`
    pub local_x: u32,
    pub local_y: u32,
}

/// What happened to the tier stage during one attempt
#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    /// No primary match, the tier stage never ran
    NotSearched,
    /// A search region could not be derived
    Rejected(TierRejection),
    Searched(TierMatch),
}

impl TierOutcome {
    /// Score of an actual search; `None` when nothing was searched
    pub fn score(&self) -> Option<f32> {
        match self {
            TierOutcome::Searched(m) => Some(m.result.score),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            TierOutcome::Searched(m) => Some(&m.result),
            _ => None,
        }
    }
}
