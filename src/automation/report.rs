//! Human-readable record of one attempt

use crate::template_matching::{TierOutcome, Verdict};
use std::fmt;

#[derive(Debug, Clone)]
pub struct AttemptReport {
    pub attempt: u32,
    pub verdict: Verdict,
}

impl AttemptReport {
    pub fn new(attempt: u32, verdict: Verdict) -> Self {
        Self { attempt, verdict }
    }

    /// One-line form for status bars
    pub fn summary_line(&self) -> String {
        let primary = match &self.verdict.primary.selected {
            Some(m) => format!("{} {:.4}", m.template, m.score),
            None => match self.verdict.primary.best_score() {
                Some(best) => format!("no match (best {:.4})", best),
                None => "no match".to_string(),
            },
        };
        let tier = match self.verdict.tier_score() {
            Some(score) => format!("{:.4}", score),
            None => "-".to_string(),
        };
        format!(
            "#{} {} | primary {} | tier {}",
            self.attempt,
            if self.verdict.success { "PASS" } else { "FAIL" },
            primary,
            tier
        )
    }
}

fn marker(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

impl fmt::Display for AttemptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.verdict;
        writeln!(f, "Attempt {}", self.attempt)?;
        for candidate in &v.primary.candidates {
            match candidate.score {
                Some(score) => writeln!(
                    f,
                    "  [{}] {}: {:.4}",
                    marker(candidate.passed),
                    candidate.template,
                    score
                )?,
                None => writeln!(f, "  [SKIP] {}: larger than capture", candidate.template)?,
            }
        }
        match &v.primary.selected {
            Some(m) => writeln!(
                f,
                "  selected: {} at ({}, {}) score {:.4} (threshold {:.2})",
                m.template, m.x, m.y, m.score, v.thresholds.primary
            )?,
            None => writeln!(
                f,
                "  selected: none (threshold {:.2})",
                v.thresholds.primary
            )?,
        }
        match &v.tier {
            TierOutcome::NotSearched => writeln!(f, "  tier: not searched")?,
            TierOutcome::Rejected(reason) => writeln!(f, "  tier: not searched, {}", reason)?,
            TierOutcome::Searched(t) => writeln!(
                f,
                "  tier: [{}] {:.4} at ({}, {}) (threshold {:.2})",
                marker(v.tier_passed),
                t.result.score,
                t.result.x,
                t.result.y,
                v.thresholds.tier
            )?,
        }
        write!(
            f,
            "  verdict: {}",
            if v.success { "SUCCESS" } else { "FAIL" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_matching::{
        CandidateScore, MatchResult, MatchThresholds, PrimarySelection, Region, TierMatch,
        TierRejection,
    };

    fn selection() -> PrimarySelection {
        PrimarySelection {
            candidates: vec![
                CandidateScore {
                    template: "crit".to_string(),
                    score: Some(0.923_456),
                    passed: true,
                },
                CandidateScore {
                    template: "speed".to_string(),
                    score: Some(0.7),
                    passed: false,
                },
                CandidateScore {
                    template: "huge".to_string(),
                    score: None,
                    passed: false,
                },
            ],
            selected_index: Some(0),
            selected: Some(MatchResult {
                template: "crit".to_string(),
                score: 0.923_456,
                x: 20,
                y: 30,
                width: 60,
                height: 16,
            }),
        }
    }

    #[test]
    fn test_report_lists_every_candidate() {
        let tier = TierOutcome::Searched(TierMatch {
            result: MatchResult {
                template: "t5".to_string(),
                score: 0.95,
                x: 140,
                y: 32,
                width: 12,
                height: 12,
            },
            search_region: Region::new(80, 30, 220, 16),
            local_x: 60,
            local_y: 2,
        });
        let report = AttemptReport::new(3, Verdict::new(selection(), tier, MatchThresholds::default()));
        let text = report.to_string();
        assert!(text.starts_with("Attempt 3\n"));
        assert!(text.contains("[PASS] crit: 0.9235"));
        assert!(text.contains("[FAIL] speed: 0.7000"));
        assert!(text.contains("[SKIP] huge"));
        assert!(text.contains("tier: [PASS] 0.9500 at (140, 32)"));
        assert!(text.ends_with("verdict: SUCCESS"));
        assert_eq!(
            report.summary_line(),
            "#3 PASS | primary crit 0.9235 | tier 0.9500"
        );
    }

    #[test]
    fn test_report_distinguishes_unsearched_tier() {
        let report = AttemptReport::new(
            1,
            Verdict::new(
                selection(),
                TierOutcome::Rejected(TierRejection::NoRoomToRight),
                MatchThresholds::default(),
            ),
        );
        let text = report.to_string();
        assert!(text.contains("tier: not searched, no room to the right"));
        assert!(text.ends_with("verdict: FAIL"));
        assert!(report.summary_line().ends_with("tier -"));
    }
}
