//! Persistent configuration for the reforge loop and the bar monitor
//!
//! Both documents are flat JSON objects. Missing keys take their defaults,
//! and points/rectangles also accept the older `"(x, y)"` text form where
//! `"(?, ?)"` means "not picked yet".

use crate::desktop::{InputKey, ScreenPoint, ScreenRect};
use crate::error::{ReforgeError, ReforgeResult};
use crate::template_matching::MatchThresholds;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REFORGE_CONFIG: &str = "reforge_config.json";
pub const DEFAULT_MONITOR_CONFIG: &str = "monitor_config.json";

/// Settings for one reforge run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReforgeConfig {
    /// Orb to right-click once before the loop
    #[serde(deserialize_with = "legacy::point")]
    pub orb_pos: Option<ScreenPoint>,
    /// Item to click every attempt
    #[serde(deserialize_with = "legacy::point")]
    pub equip_pos: Option<ScreenPoint>,
    /// Captured rectangle holding the modifier lines
    #[serde(deserialize_with = "legacy::rect")]
    pub mod_region: Option<ScreenRect>,
    pub main_threshold: f32,
    pub tier_threshold: f32,
    pub max_attempts: u32,
    /// Seconds after the orb right-click
    pub orb_delay: f64,
    /// Seconds after clicking the item
    pub equip_click_delay: f64,
    /// Seconds between pressing Alt and capturing
    pub alt_screenshot_delay: f64,
    /// Upper bound of the random pause between attempts, in seconds
    pub loop_random_max: f64,
    pub main_template_paths: Vec<PathBuf>,
    pub tier_template_path: Option<PathBuf>,
    pub cache_results: bool,
    pub cache_dir: PathBuf,
    pub cache_size: usize,
}

impl Default for ReforgeConfig {
    fn default() -> Self {
        Self {
            orb_pos: None,
            equip_pos: None,
            mod_region: None,
            main_threshold: 0.85,
            tier_threshold: 0.90,
            max_attempts: 200,
            orb_delay: 0.25,
            equip_click_delay: 0.75,
            alt_screenshot_delay: 0.0,
            loop_random_max: 0.02,
            main_template_paths: Vec::new(),
            tier_template_path: None,
            cache_results: true,
            cache_dir: PathBuf::from("equipment_cache"),
            cache_size: 10,
        }
    }
}

/// Waits used by the reforge loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunTimings {
    pub orb_delay: Duration,
    pub equip_click_delay: Duration,
    pub alt_screenshot_delay: Duration,
    pub jitter_max: Duration,
}

fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

fn check_threshold(name: &str, value: f32) -> ReforgeResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ReforgeError::invalid_config(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_delay(name: &str, value: f64) -> ReforgeResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ReforgeError::invalid_config(format!(
            "{name} must be a non-negative number of seconds, got {value}"
        )));
    }
    Ok(())
}

impl ReforgeConfig {
    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            primary: self.main_threshold,
            tier: self.tier_threshold,
        }
    }

    pub fn timings(&self) -> RunTimings {
        RunTimings {
            orb_delay: seconds(self.orb_delay),
            equip_click_delay: seconds(self.equip_click_delay),
            alt_screenshot_delay: seconds(self.alt_screenshot_delay),
            jitter_max: seconds(self.loop_random_max),
        }
    }

    /// Checks that only concern the loop itself, not the template files
    pub fn validate_run_settings(&self) -> ReforgeResult<()> {
        check_threshold("main_threshold", self.main_threshold)?;
        check_threshold("tier_threshold", self.tier_threshold)?;
        if self.max_attempts == 0 {
            return Err(ReforgeError::invalid_config(
                "max_attempts must be a positive integer",
            ));
        }
        for (name, value) in [
            ("orb_delay", self.orb_delay),
            ("equip_click_delay", self.equip_click_delay),
            ("alt_screenshot_delay", self.alt_screenshot_delay),
            ("loop_random_max", self.loop_random_max),
        ] {
            check_delay(name, value)?;
        }

        let region = self
            .mod_region
            .ok_or_else(|| ReforgeError::invalid_config("mod_region has not been selected"))?;
        if region.is_empty() {
            return Err(ReforgeError::InvalidRegion {
                name: "mod_region".to_string(),
                width: region.width,
                height: region.height,
            });
        }
        if self.orb_pos.is_none() {
            return Err(ReforgeError::invalid_config("orb_pos has not been selected"));
        }
        if self.equip_pos.is_none() {
            return Err(ReforgeError::invalid_config("equip_pos has not been selected"));
        }
        Ok(())
    }

    /// Full setup validation before a run
    pub fn validate(&self) -> ReforgeResult<()> {
        self.validate_run_settings()?;
        self.validate_templates()
    }

    /// Template list checks, shared with the offline match test
    pub fn validate_templates(&self) -> ReforgeResult<()> {
        if self.main_template_paths.is_empty() {
            return Err(ReforgeError::invalid_config(
                "at least one primary template is required",
            ));
        }
        if self.tier_template_path.is_none() {
            return Err(ReforgeError::invalid_config("tier template has not been selected"));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> ReforgeResult<Self> {
        load_json(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ReforgeResult<()> {
        save_json(self, path.as_ref())
    }
}

/// Settings for the resource bar monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub hp_key: String,
    /// Percent below which the life key is pressed
    pub hp_threshold: f32,
    pub disable_hp: bool,
    pub enable_hp_timer: bool,
    pub hp_timer_interval: f64,
    pub mp_key: String,
    pub mp_threshold: f32,
    pub disable_mp: bool,
    pub enable_mp_timer: bool,
    pub mp_timer_interval: f64,
    /// Seconds between polls
    pub check_interval: f64,
    #[serde(deserialize_with = "legacy::rect")]
    pub hp_region: Option<ScreenRect>,
    #[serde(deserialize_with = "legacy::rect")]
    pub mp_region: Option<ScreenRect>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            hp_key: "1".to_string(),
            hp_threshold: 35.0,
            disable_hp: false,
            enable_hp_timer: false,
            hp_timer_interval: 5.0,
            mp_key: "2".to_string(),
            mp_threshold: 35.0,
            disable_mp: false,
            enable_mp_timer: false,
            mp_timer_interval: 8.0,
            check_interval: 0.3,
            hp_region: None,
            mp_region: None,
        }
    }
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        seconds(self.check_interval)
    }

    pub fn hp_timer_interval(&self) -> Duration {
        seconds(self.hp_timer_interval)
    }

    pub fn mp_timer_interval(&self) -> Duration {
        seconds(self.mp_timer_interval)
    }

    pub fn validate(&self) -> ReforgeResult<()> {
        InputKey::parse(&self.hp_key)?;
        InputKey::parse(&self.mp_key)?;
        for (name, value) in [("hp_threshold", self.hp_threshold), ("mp_threshold", self.mp_threshold)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ReforgeError::invalid_config(format!(
                    "{name} must be a percentage, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("check_interval", self.check_interval),
            ("hp_timer_interval", self.hp_timer_interval),
            ("mp_timer_interval", self.mp_timer_interval),
        ] {
            check_delay(name, value)?;
        }
        if self.hp_region.is_none() && self.mp_region.is_none() {
            return Err(ReforgeError::invalid_config(
                "select at least one of hp_region or mp_region",
            ));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> ReforgeResult<Self> {
        load_json(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ReforgeResult<()> {
        save_json(self, path.as_ref())
    }
}

fn load_json<T>(path: &Path) -> ReforgeResult<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(T::default());
    }
    let text = fs::read_to_string(path).map_err(|source| ReforgeError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&text).map_err(|source| ReforgeError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded config from {}", path.display());
    Ok(value)
}

fn save_json<T: Serialize>(value: &T, path: &Path) -> ReforgeResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|source| ReforgeError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReforgeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| ReforgeError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Saved config to {}", path.display());
    Ok(())
}

/// Deserializers for points and rectangles stored as arrays or legacy text
mod legacy {
    use super::*;
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Numbers(Vec<i64>),
        Text(String),
    }

    /// `None` for placeholders such as `"(?, ?)"` or an empty string
    fn numbers<'de, D: Deserializer<'de>>(
        deserializer: D,
        expected: usize,
    ) -> Result<Option<Vec<i64>>, D::Error> {
        let Some(repr) = Option::<Repr>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let values = match repr {
            Repr::Numbers(values) => values,
            Repr::Text(text) => {
                let inner = text.trim().trim_start_matches('(').trim_end_matches(')');
                if inner.trim().is_empty() || inner.contains('?') {
                    return Ok(None);
                }
                inner
                    .split(',')
                    .map(|part| part.trim().parse::<i64>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| D::Error::custom(format!("invalid coordinate text '{text}': {e}")))?
            }
        };
        if values.len() != expected {
            return Err(D::Error::custom(format!(
                "expected {expected} numbers, got {}",
                values.len()
            )));
        }
        Ok(Some(values))
    }

    pub fn point<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ScreenPoint>, D::Error> {
        Ok(numbers(deserializer, 2)?.map(|v| {
            ScreenPoint::new(
                v[0].clamp(i32::MIN as i64, i32::MAX as i64) as i32,
                v[1].clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            )
        }))
    }

    pub fn rect<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ScreenRect>, D::Error> {
        Ok(numbers(deserializer, 4)?.map(|v| ScreenRect::from([v[0], v[1], v[2], v[3]])))
    }
}
