//! Helpers turning form text into configuration values and back

use crate::desktop::{ScreenPoint, ScreenRect};
use std::path::PathBuf;

fn numbers(text: &str) -> Option<Vec<i64>> {
    let inner = text.trim().trim_start_matches('(').trim_end_matches(')');
    if inner.trim().is_empty() {
        return None;
    }
    inner
        .split(',')
        .map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

/// `"x, y"` with optional parentheses
pub fn parse_point(text: &str) -> Option<ScreenPoint> {
    match numbers(text)?.as_slice() {
        [x, y] => Some(ScreenPoint::new(i32::try_from(*x).ok()?, i32::try_from(*y).ok()?)),
        _ => None,
    }
}

/// `"x, y, w, h"` with optional parentheses
pub fn parse_rect(text: &str) -> Option<ScreenRect> {
    match numbers(text)?.as_slice() {
        [x, y, w, h] if *w >= 0 && *h >= 0 => Some(ScreenRect::from([*x, *y, *w, *h])),
        _ => None,
    }
}

pub fn format_point(point: Option<ScreenPoint>) -> String {
    point.map(|p| format!("{}, {}", p.x, p.y)).unwrap_or_default()
}

pub fn format_rect(rect: Option<ScreenRect>) -> String {
    rect.map(|r| format!("{}, {}, {}, {}", r.x, r.y, r.width, r.height))
        .unwrap_or_default()
}

/// One path per non-empty line
pub fn parse_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_percent(value: Option<f32>) -> String {
    value.map(|v| format!("{v:.1}%")).unwrap_or_else(|| "--%".to_string())
}

/// Wall-clock prefix for log lines
pub fn timestamped(message: impl AsRef<str>) -> String {
    format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_text() {
        assert_eq!(parse_point("120, 340"), Some(ScreenPoint::new(120, 340)));
        assert_eq!(parse_point("(5,6)"), Some(ScreenPoint::new(5, 6)));
        assert_eq!(parse_point("1, 2, 3"), None);
        assert_eq!(parse_point("?, ?"), None);
        assert_eq!(parse_point(""), None);
        assert_eq!(format_point(Some(ScreenPoint::new(-3, 4))), "-3, 4");
    }

    #[test]
    fn test_rect_text() {
        let rect = parse_rect("10, 20, 300, 80").unwrap();
        assert_eq!(rect, ScreenRect::new(10, 20, 300, 80));
        assert_eq!(parse_rect(&format_rect(Some(rect))), Some(rect));
        assert_eq!(parse_rect("10, 20, -1, 80"), None);
        assert_eq!(format_rect(None), "");
    }

    #[test]
    fn test_paths_text() {
        let paths = parse_paths("templates/crit.png\n\n  templates/speed.png  \n");
        assert_eq!(
            paths,
            vec![PathBuf::from("templates/crit.png"), PathBuf::from("templates/speed.png")]
        );
        assert_eq!(format_paths(&paths), "templates/crit.png\ntemplates/speed.png");
    }

    #[test]
    fn test_percent_text() {
        assert_eq!(format_percent(Some(42.34)), "42.3%");
        assert_eq!(format_percent(None), "--%");
    }
}
