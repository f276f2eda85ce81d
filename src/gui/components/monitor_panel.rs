// gui/components/monitor_panel.rs
use crate::config::MonitorConfig;
use crate::gui::components::fields::*;
use crate::gui::hooks::{LogSignal, MonitorSignals, push_log, start_monitor, stop_monitor};
use crate::gui::util::{format_percent, format_rect, parse_rect};
use dioxus::prelude::*;
use std::path::PathBuf;

#[derive(Props, PartialEq, Clone)]
pub struct MonitorPanelProps {
    pub signals: MonitorSignals,
    pub log: LogSignal,
    pub config_path: PathBuf,
}

fn commit_number(
    mut config: Signal<MonitorConfig>,
    log: LogSignal,
    name: &'static str,
    text: String,
    apply: impl FnOnce(&mut MonitorConfig, f64),
) {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => config.with_mut(|c| apply(c, value)),
        _ => push_log(log, format!("⚠️ {name}: '{text}' is not a non-negative number")),
    }
}

fn gauge_style(color: &str) -> String {
    format!("font-size:1.6em; font-weight:700; color:{color}; font-family:monospace;")
}

#[component]
pub fn MonitorPanel(props: MonitorPanelProps) -> Element {
    let signals = props.signals;
    let log = props.log;
    let mut config = signals.config;
    let current = config.read().clone();
    let running = signals.running.read().is_some();
    let hp_text = format_percent(*signals.hp.read());
    let mp_text = format_percent(*signals.mp.read());
    let start_path = props.config_path.clone();

    rsx! {
        div { style: PANEL_STYLE,
            h2 { style: "margin:0; color:#87ceeb; font-size:1.1em;", "🩸 Bar monitor" }
            div { style: "display:flex; gap:24px;",
                div { span { style: "opacity:0.8; font-size:0.8em;", "HP " } span { style: gauge_style("#ff6262"), "{hp_text}" } }
                div { span { style: "opacity:0.8; font-size:0.8em;", "MP " } span { style: gauge_style("#62a8ff"), "{mp_text}" } }
            }

            TextField { label: "HP region (x, y, w, h)", value: format_rect(current.hp_region), placeholder: "narrow and tall",
                on_commit: move |text: String| {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        config.with_mut(|c| c.hp_region = None);
                    } else if let Some(r) = parse_rect(trimmed) {
                        config.with_mut(|c| c.hp_region = Some(r));
                    } else {
                        push_log(log, format!("⚠️ hp_region: '{text}' is not 'x, y, w, h'"));
                    }
                }
            }
            TextField { label: "MP region (x, y, w, h)", value: format_rect(current.mp_region), placeholder: "narrow and tall",
                on_commit: move |text: String| {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        config.with_mut(|c| c.mp_region = None);
                    } else if let Some(r) = parse_rect(trimmed) {
                        config.with_mut(|c| c.mp_region = Some(r));
                    } else {
                        push_log(log, format!("⚠️ mp_region: '{text}' is not 'x, y, w, h'"));
                    }
                }
            }

            TextField { label: "HP key", value: current.hp_key.clone(),
                on_commit: move |text: String| config.with_mut(|c| c.hp_key = text.trim().to_string()) }
            TextField { label: "HP threshold (%)", value: current.hp_threshold.to_string(),
                on_commit: move |text: String| commit_number(config, log, "hp_threshold", text, |c, v| c.hp_threshold = v.min(100.0) as f32) }
            CheckField { label: "Disable HP", checked: current.disable_hp,
                on_toggle: move |checked: bool| config.with_mut(|c| c.disable_hp = checked) }
            CheckField { label: "⏱️ Timed HP", checked: current.enable_hp_timer,
                on_toggle: move |checked: bool| config.with_mut(|c| c.enable_hp_timer = checked) }
            TextField { label: "HP timer (s)", value: current.hp_timer_interval.to_string(),
                on_commit: move |text: String| commit_number(config, log, "hp_timer_interval", text, |c, v| c.hp_timer_interval = v) }

            TextField { label: "MP key", value: current.mp_key.clone(),
                on_commit: move |text: String| config.with_mut(|c| c.mp_key = text.trim().to_string()) }
            TextField { label: "MP threshold (%)", value: current.mp_threshold.to_string(),
                on_commit: move |text: String| commit_number(config, log, "mp_threshold", text, |c, v| c.mp_threshold = v.min(100.0) as f32) }
            CheckField { label: "Disable MP", checked: current.disable_mp,
                on_toggle: move |checked: bool| config.with_mut(|c| c.disable_mp = checked) }
            CheckField { label: "⏱️ Timed MP", checked: current.enable_mp_timer,
                on_toggle: move |checked: bool| config.with_mut(|c| c.enable_mp_timer = checked) }
            TextField { label: "MP timer (s)", value: current.mp_timer_interval.to_string(),
                on_commit: move |text: String| commit_number(config, log, "mp_timer_interval", text, |c, v| c.mp_timer_interval = v) }

            TextField { label: "Check interval (s)", value: current.check_interval.to_string(),
                on_commit: move |text: String| commit_number(config, log, "check_interval", text, |c, v| c.check_interval = v) }

            div { style: "display:flex; gap:10px;",
                if running {
                    button { style: STOP_BUTTON_STYLE, onclick: move |_| stop_monitor(signals), "⏹ Stop (F12)" }
                } else {
                    button { style: BUTTON_STYLE,
                        onclick: move |_| start_monitor(config.read().clone(), start_path.clone(), signals, log),
                        "▶ Start monitor" }
                }
            }
        }
    }
}
