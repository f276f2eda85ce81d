//! Tier icon search to the right of the primary match
//!
//! The tier icon renders on the same line as the primary modifier and
//! strictly to its right, so the search is confined to that strip.

use super::correlation::best_match_in;
use super::template::Template;
use super::types::{MatchResult, Region, TierMatch, TierOutcome, TierRejection};
use image::GrayImage;

/// Derive the strip to the right of `primary` inside a `screen` sized image
///
/// `screen` and `tier` are `(width, height)` pairs.
pub fn locate_tier_region(
    screen: (u32, u32),
    primary: &Region,
    tier: (u32, u32),
) -> Result<Region, TierRejection> {
    let (screen_w, screen_h) = screen;
    let (tier_w, tier_h) = tier;

    let left = primary.right();
    if left >= screen_w {
        return Err(TierRejection::NoRoomToRight);
    }
    if primary.bottom() > screen_h {
        return Err(TierRejection::PrimaryOutOfBounds);
    }

    let region = Region::new(left, primary.y, screen_w - left, primary.height);
    if !region.can_hold(tier_w, tier_h) {
        return Err(TierRejection::TierTemplateTooLarge);
    }
    Ok(region)
}

/// Search `tier` inside `region` of `screenshot`
///
/// The reported match is in capture coordinates.
pub fn match_tier(screenshot: &GrayImage, region: &Region, tier: &Template) -> Option<TierMatch> {
    let peak = best_match_in(screenshot, &tier.image, region)?;
    Some(TierMatch {
        result: MatchResult {
            template: tier.name.clone(),
            score: peak.score,
            x: region.x + peak.x,
            y: region.y + peak.y,
            width: tier.width(),
            height: tier.height(),
        },
        search_region: *region,
        local_x: peak.x,
        local_y: peak.y,
    })
}

/// Locate the strip for `primary` and run the tier search in it
pub fn search_tier(screenshot: &GrayImage, primary: &MatchResult, tier: &Template) -> TierOutcome {
    let region = match locate_tier_region(
        screenshot.dimensions(),
        &primary.bounding_box(),
        (tier.width(), tier.height()),
    ) {
        Ok(region) => region,
        Err(reason) => {
            log::debug!("Tier region rejected for '{}': {}", primary.template, reason);
            return TierOutcome::Rejected(reason);
        }
    };

    match match_tier(screenshot, &region, tier) {
        Some(found) => TierOutcome::Searched(found),
        // Region was validated against the screenshot and the template above
        None => TierOutcome::Rejected(TierRejection::TierTemplateTooLarge),
    }
}
