//! Primary-match selection across an ordered template set

use super::correlation::best_match;
use super::template::Template;
use super::types::{CandidateScore, MatchResult, PrimarySelection};
use image::GrayImage;

/// Score every template against `screenshot` and pick the winner
///
/// Templates larger than the screenshot are skipped. Among templates whose
/// best score reaches `threshold`, the strictly highest score wins; equal
/// scores keep the earlier template.
pub fn select_primary(
    screenshot: &GrayImage,
    templates: &[Template],
    threshold: f32,
) -> PrimarySelection {
    let (sw, sh) = screenshot.dimensions();
    let mut selection = PrimarySelection::default();

    for (index, template) in templates.iter().enumerate() {
        if !template.fits_within(sw, sh) {
            log::debug!(
                "Skipping template '{}' ({}x{}): larger than {}x{} screenshot",
                template.name,
                template.width(),
                template.height(),
                sw,
                sh
            );
            selection.candidates.push(CandidateScore {
                template: template.name.clone(),
                score: None,
                passed: false,
            });
            continue;
        }

        let Some(peak) = best_match(screenshot, &template.image) else {
            selection.candidates.push(CandidateScore {
                template: template.name.clone(),
                score: None,
                passed: false,
            });
            continue;
        };

        let passed = peak.score >= threshold;
        selection.candidates.push(CandidateScore {
            template: template.name.clone(),
            score: Some(peak.score),
            passed,
        });

        if !passed {
            continue;
        }
        let better = selection
            .selected
            .as_ref()
            .is_none_or(|current| peak.score > current.score);
        if better {
            selection.selected_index = Some(index);
            selection.selected = Some(MatchResult {
                template: template.name.clone(),
                score: peak.score,
                x: peak.x,
                y: peak.y,
                width: template.width(),
                height: template.height(),
            });
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn bars(width: u32, height: u32, period: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if (x + 2 * y) % period < period / 2 {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_oversized_template_is_skipped() {
        let screenshot = bars(20, 10, 4);
        let big = Template::from_binarized("big", bars(21, 4, 4));
        let selection = select_primary(&screenshot, &[big], 0.5);
        assert!(!selection.is_match());
        assert_eq!(selection.candidates.len(), 1);
        assert_eq!(selection.candidates[0].score, None);
        assert!(!selection.candidates[0].passed);
    }

    #[test]
    fn test_below_threshold_is_no_match() {
        let screenshot = GrayImage::from_fn(20, 10, |x, _| Luma([if x < 10 { 0 } else { 255 }]));
        // A checkerboard never lines up with a single vertical edge
        let template = Template::from_binarized(
            "checker",
            GrayImage::from_fn(4, 4, |x, y| Luma([if (x + y) % 2 == 0 { 255 } else { 0 }])),
        );
        let selection = select_primary(&screenshot, &[template], 0.85);
        assert!(!selection.is_match());
        assert!(selection.candidates[0].score.is_some());
        assert!(selection.best_score().unwrap() < 0.85);
    }

    #[test]
    fn test_equal_scores_keep_first_template() {
        let screenshot = bars(24, 12, 6);
        let crop = image::imageops::crop_imm(&screenshot, 3, 2, 6, 4).to_image();
        let first = Template::from_binarized("first", crop.clone());
        let second = Template::from_binarized("second", crop);
        let selection = select_primary(&screenshot, &[first, second], 0.9);
        assert_eq!(selection.selected_index, Some(0));
        assert_eq!(selection.selected.unwrap().template, "first");
        assert!(selection.candidates.iter().all(|c| c.passed));
    }

    #[test]
    fn test_highest_score_wins_regardless_of_order() {
        let screenshot = bars(24, 12, 6);
        let exact = image::imageops::crop_imm(&screenshot, 0, 0, 6, 4).to_image();
        let mut damaged = exact.clone();
        damaged.put_pixel(0, 0, Luma([255 - damaged.get_pixel(0, 0).0[0]]));
        let templates = [
            Template::from_binarized("damaged", damaged),
            Template::from_binarized("exact", exact),
        ];
        let selection = select_primary(&screenshot, &templates, 0.5);
        assert_eq!(selection.selected_index, Some(1));
        assert_eq!(selection.selected.unwrap().template, "exact");
    }
}
