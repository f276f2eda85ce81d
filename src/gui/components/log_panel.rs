// gui/components/log_panel.rs
use crate::gui::hooks::LogSignal;
use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct LogPanelProps {
    pub log: LogSignal,
}

#[component]
pub fn LogPanel(props: LogPanelProps) -> Element {
    let mut log = props.log;
    let lines = log.read().clone();
    rsx! {
        div { style: "background: rgba(255,255,255,0.08); padding:12px 16px; border-radius:12px; border:1px solid rgba(255,255,255,0.15); display:flex; flex-direction:column; gap:6px; min-height:0;",
            div { style: "display:flex; align-items:center; gap:8px;",
                h3 { style: "margin:0; font-size:0.85em; letter-spacing:0.5px; opacity:0.85; flex:1;", "📜 Log" }
                button { style: "background: rgba(255,255,255,0.15); color:#fff; border:1px solid rgba(255,255,255,0.3); padding:2px 8px; border-radius:5px; font-size:0.65em; cursor:pointer;",
                    onclick: move |_| log.set(Vec::new()), "Clear" }
            }
            div { style: "font-family:monospace; font-size:0.72em; line-height:1.3; max-height:260px; overflow:auto; display:flex; flex-direction:column-reverse;",
                for (i, line) in lines.iter().enumerate().rev() {
                    div { key: "{i}", "{line}" }
                }
            }
        }
    }
}
