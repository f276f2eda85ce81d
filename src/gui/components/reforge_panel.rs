// gui/components/reforge_panel.rs
use crate::automation::RunState;
use crate::config::ReforgeConfig;
use crate::desktop::{ScreenPoint, ScreenRect, cursor_position};
use crate::gui::components::fields::*;
use crate::gui::hooks::{LogSignal, ReforgeSignals, push_log, start_reforge, stop_reforge};
use crate::gui::util::{format_paths, format_point, format_rect, parse_paths, parse_point, parse_rect};
use dioxus::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

const PICK_COUNTDOWN: u64 = 3;

#[derive(Props, PartialEq, Clone)]
pub struct ReforgePanelProps {
    pub signals: ReforgeSignals,
    pub log: LogSignal,
    pub config_path: PathBuf,
}

fn state_label(state: &RunState) -> String {
    match state {
        RunState::Idle => "⏸ Idle".to_string(),
        RunState::Preparing => "🔮 Applying orb...".to_string(),
        RunState::Attempting(n) => format!("🔁 Attempt {n}"),
        RunState::Finished => "⏹ Finished".to_string(),
    }
}

/// Count down in the log, then read the cursor position
async fn pick_after_countdown(log: LogSignal, what: &str) -> ScreenPoint {
    for remaining in (1..=PICK_COUNTDOWN).rev() {
        push_log(log, format!("📍 Hover over the {what}... {remaining}s"));
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    cursor_position()
}

/// Apply a committed number to the config, logging rejected text
fn commit_number<T: std::str::FromStr>(
    mut config: Signal<ReforgeConfig>,
    log: LogSignal,
    name: &'static str,
    text: String,
    apply: impl FnOnce(&mut ReforgeConfig, T),
) {
    match text.trim().parse::<T>() {
        Ok(value) => config.with_mut(|c| apply(c, value)),
        Err(_) => push_log(log, format!("⚠️ {name}: '{text}' is not a number")),
    }
}

#[component]
pub fn ReforgePanel(props: ReforgePanelProps) -> Element {
    let signals = props.signals;
    let log = props.log;
    let mut config = signals.config;
    let current = config.read().clone();
    let state_text = state_label(&signals.state.read());
    let templates_text = format_paths(&current.main_template_paths);
    let running = signals.command_tx.read().is_some();
    let last = signals.last_summary.read().clone();
    let save_path = props.config_path.clone();
    let start_path = props.config_path.clone();

    rsx! {
        div { style: PANEL_STYLE,
            h2 { style: "margin:0; color:#87ceeb; font-size:1.1em;", "🔮 Reforge" }
            div { style: "font-size:0.8em; opacity:0.85;", "{state_text}" }
            if let Some(line) = last { div { style: "font-size:0.75em; font-family:monospace; opacity:0.8;", "{line}" } }

            div { style: "display:flex; align-items:center; gap:6px;",
                TextField { label: "Orb position (x, y)", value: format_point(current.orb_pos), placeholder: "(?, ?)",
                    on_commit: move |text: String| match parse_point(&text) {
                        Some(p) => config.with_mut(|c| c.orb_pos = Some(p)),
                        None => push_log(log, format!("⚠️ orb_pos: '{text}' is not 'x, y'")),
                    }
                }
                button { style: SMALL_BUTTON_STYLE,
                    onclick: move |_| { spawn(async move {
                        let p = pick_after_countdown(log, "orb").await;
                        config.with_mut(|c| c.orb_pos = Some(p));
                        push_log(log, format!("✅ Orb position {p}"));
                    }); },
                    "📍 Pick" }
            }
            div { style: "display:flex; align-items:center; gap:6px;",
                TextField { label: "Equipment position (x, y)", value: format_point(current.equip_pos), placeholder: "(?, ?)",
                    on_commit: move |text: String| match parse_point(&text) {
                        Some(p) => config.with_mut(|c| c.equip_pos = Some(p)),
                        None => push_log(log, format!("⚠️ equip_pos: '{text}' is not 'x, y'")),
                    }
                }
                button { style: SMALL_BUTTON_STYLE,
                    onclick: move |_| { spawn(async move {
                        let p = pick_after_countdown(log, "equipment").await;
                        config.with_mut(|c| c.equip_pos = Some(p));
                        push_log(log, format!("✅ Equipment position {p}"));
                    }); },
                    "📍 Pick" }
            }
            div { style: "display:flex; align-items:center; gap:6px;",
                TextField { label: "Modifier region (x, y, w, h)", value: format_rect(current.mod_region), placeholder: "(?, ?, ?, ?)",
                    on_commit: move |text: String| match parse_rect(&text) {
                        Some(r) => config.with_mut(|c| c.mod_region = Some(r)),
                        None => push_log(log, format!("⚠️ mod_region: '{text}' is not 'x, y, w, h'")),
                    }
                }
                button { style: SMALL_BUTTON_STYLE,
                    onclick: move |_| { spawn(async move {
                        let a = pick_after_countdown(log, "top-left corner").await;
                        let b = pick_after_countdown(log, "bottom-right corner").await;
                        let rect = ScreenRect::new(
                            a.x.min(b.x),
                            a.y.min(b.y),
                            a.x.abs_diff(b.x),
                            a.y.abs_diff(b.y),
                        );
                        config.with_mut(|c| c.mod_region = Some(rect));
                        push_log(log, format!("✅ Modifier region {rect}"));
                    }); },
                    "📐 Pick" }
            }

            TextField { label: "Main threshold", value: format!("{:.2}", current.main_threshold),
                on_commit: move |text: String| commit_number(config, log, "main_threshold", text, |c, v: f32| c.main_threshold = v.clamp(0.0, 1.0)) }
            TextField { label: "Tier threshold", value: format!("{:.2}", current.tier_threshold),
                on_commit: move |text: String| commit_number(config, log, "tier_threshold", text, |c, v: f32| c.tier_threshold = v.clamp(0.0, 1.0)) }
            TextField { label: "Max attempts", value: current.max_attempts.to_string(),
                on_commit: move |text: String| commit_number(config, log, "max_attempts", text, |c, v: u32| c.max_attempts = v.max(1)) }
            TextField { label: "Orb delay (s)", value: current.orb_delay.to_string(),
                on_commit: move |text: String| commit_number(config, log, "orb_delay", text, |c, v: f64| c.orb_delay = v.max(0.0)) }
            TextField { label: "Click delay (s)", value: current.equip_click_delay.to_string(),
                on_commit: move |text: String| commit_number(config, log, "equip_click_delay", text, |c, v: f64| c.equip_click_delay = v.max(0.0)) }
            TextField { label: "Alt capture delay (s)", value: current.alt_screenshot_delay.to_string(),
                on_commit: move |text: String| commit_number(config, log, "alt_screenshot_delay", text, |c, v: f64| c.alt_screenshot_delay = v.max(0.0)) }
            TextField { label: "Random pause max (s)", value: current.loop_random_max.to_string(),
                on_commit: move |text: String| commit_number(config, log, "loop_random_max", text, |c, v: f64| c.loop_random_max = v.max(0.0)) }

            label { style: "display:flex; flex-direction:column; gap:4px; font-size:0.85em;",
                span { style: "opacity:0.85;", "Modifier templates (one path per line, in priority order)" }
                textarea {
                    style: "background: rgba(0,0,0,0.25); color:white; border:1px solid rgba(255,255,255,0.3); border-radius:6px; padding:4px 6px; font-size:0.8em; min-height:60px;",
                    value: "{templates_text}",
                    onchange: move |evt| {
                        let paths = parse_paths(&evt.value());
                        config.with_mut(|c| c.main_template_paths = paths);
                    },
                }
            }
            TextField { label: "Tier template", value: current.tier_template_path.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
                on_commit: move |text: String| {
                    let trimmed = text.trim().to_string();
                    config.with_mut(|c| c.tier_template_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed)));
                }
            }
            CheckField { label: "💾 Cache annotated results", checked: current.cache_results,
                on_toggle: move |checked: bool| config.with_mut(|c| c.cache_results = checked) }

            div { style: "display:flex; gap:10px; flex-wrap:wrap;",
                if running {
                    button { style: STOP_BUTTON_STYLE, onclick: move |_| stop_reforge(signals, log), "⏹ Stop (F12)" }
                } else {
                    button { style: BUTTON_STYLE,
                        onclick: move |_| start_reforge(config.read().clone(), start_path.clone(), signals, log),
                        "▶ Start" }
                }
                button { style: SMALL_BUTTON_STYLE,
                    onclick: move |_| match config.read().save(&save_path) {
                        Ok(()) => push_log(log, format!("💾 Saved {}", save_path.display())),
                        Err(e) => push_log(log, format!("❌ {e}")),
                    },
                    "💾 Save" }
            }
        }
    }
}
