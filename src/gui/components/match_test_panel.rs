// gui/components/match_test_panel.rs
use crate::automation::{DEBUG_OUTPUT, run_match_test};
use crate::config::ReforgeConfig;
use crate::gui::components::fields::*;
use crate::gui::hooks::{LogSignal, push_log};
use dioxus::prelude::*;
use std::path::PathBuf;

#[derive(Props, PartialEq, Clone)]
pub struct MatchTestPanelProps {
    pub config: Signal<ReforgeConfig>,
    pub log: LogSignal,
}

#[component]
pub fn MatchTestPanel(props: MatchTestPanelProps) -> Element {
    let config = props.config;
    let log = props.log;
    let mut screenshot = use_signal(String::new);
    let mut report = use_signal(|| None::<String>);
    let mut is_running = use_signal(|| false);
    let path_text = screenshot.read().clone();
    let report_text = report.read().clone();

    rsx! {
        div { style: PANEL_STYLE,
            h2 { style: "margin:0; color:#87ceeb; font-size:1.1em;", "🧪 Match test" }
            TextField { label: "Screenshot", value: path_text, placeholder: "screenshot.png",
                on_commit: move |text: String| screenshot.set(text.trim().to_string()) }
            button {
                style: if *is_running.read() { STOP_BUTTON_STYLE } else { BUTTON_STYLE },
                onclick: move |_| {
                    if *is_running.read() { return; }
                    let path = PathBuf::from(screenshot.read().clone());
                    if path.as_os_str().is_empty() {
                        push_log(log, "⚠️ Choose a screenshot first");
                        return;
                    }
                    let cfg = config.read().clone();
                    is_running.set(true);
                    spawn(async move {
                        let result = tokio::task::spawn_blocking(move || run_match_test(&cfg, &path, DEBUG_OUTPUT)).await;
                        match result {
                            Ok(Ok(outcome)) => {
                                push_log(log, format!("🧪 {}", outcome.report.summary_line()));
                                if let Some(visual) = &outcome.visual {
                                    push_log(log, format!("🖼️ Wrote {}", visual.display()));
                                }
                                report.set(Some(outcome.report.to_string()));
                            }
                            Ok(Err(e)) => {
                                push_log(log, format!("❌ Match test: {e}"));
                                report.set(None);
                            }
                            Err(e) => push_log(log, format!("❌ Match test task failed: {e}")),
                        }
                        is_running.set(false);
                    });
                },
                if *is_running.read() { "⏳ Matching..." } else { "🔍 Run match test" }
            }
            if let Some(text) = report_text {
                pre { style: "margin:0; font-size:0.75em; background:rgba(0,0,0,0.25); padding:8px; border-radius:8px; white-space:pre-wrap;", "{text}" }
            }
        }
    }
}
