use crate::gui::hooks::types::{LogSignal, MAX_LOG_LINES};
use crate::gui::util::timestamped;
use dioxus::prelude::*;

/// Append a timestamped line, dropping the oldest past the cap
pub fn push_log(mut log: LogSignal, line: impl AsRef<str>) {
    let line = timestamped(line);
    log.with_mut(|lines| {
        lines.push(line);
        let excess = lines.len().saturating_sub(MAX_LOG_LINES);
        lines.drain(..excess);
    });
}
