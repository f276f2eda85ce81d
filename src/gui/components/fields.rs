// gui/components/fields.rs
//! Labelled inputs that report their text once editing is committed

use dioxus::prelude::*;

pub const PANEL_STYLE: &str = "background: rgba(255,255,255,0.1); backdrop-filter: blur(10px); padding: 14px 18px; border-radius: 15px; border: 1px solid rgba(255,255,255,0.2); display:flex; flex-direction:column; gap:8px;";
pub const INPUT_STYLE: &str = "background: rgba(0,0,0,0.25); color:white; border:1px solid rgba(255,255,255,0.3); border-radius:6px; padding:4px 6px; font-size:0.85em; width:140px;";
pub const BUTTON_STYLE: &str = "background:linear-gradient(45deg,#28a745,#20c997); color:white; padding:8px 16px; border:none; border-radius:8px; cursor:pointer; font-size:0.9em; font-weight:bold;";
pub const STOP_BUTTON_STYLE: &str = "background:linear-gradient(45deg,#dc3545,#e74c3c); color:white; padding:8px 16px; border:none; border-radius:8px; cursor:pointer; font-size:0.9em; font-weight:bold;";
pub const SMALL_BUTTON_STYLE: &str = "background: rgba(255,255,255,0.15); color:#fff; border:1px solid rgba(255,255,255,0.3); padding:3px 8px; border-radius:5px; font-size:0.75em; cursor:pointer;";

#[derive(Props, PartialEq, Clone)]
pub struct TextFieldProps {
    #[props(into)]
    pub label: String,
    #[props(into)]
    pub value: String,
    #[props(default, into)]
    pub placeholder: String,
    pub on_commit: EventHandler<String>,
}

#[component]
pub fn TextField(props: TextFieldProps) -> Element {
    rsx! {
        label { style: "display:flex; align-items:center; gap:8px; font-size:0.85em;",
            span { style: "min-width:150px; opacity:0.85;", "{props.label}" }
            input {
                style: INPUT_STYLE,
                value: "{props.value}",
                placeholder: "{props.placeholder}",
                onchange: move |evt| props.on_commit.call(evt.value()),
            }
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct CheckFieldProps {
    #[props(into)]
    pub label: String,
    pub checked: bool,
    pub on_toggle: EventHandler<bool>,
}

#[component]
pub fn CheckField(props: CheckFieldProps) -> Element {
    rsx! {
        label { style: "display:flex; align-items:center; gap:8px; font-size:0.85em; cursor:pointer; user-select:none;",
            input {
                r#type: "checkbox",
                checked: props.checked,
                style: "width:16px; height:16px; cursor:pointer;",
                onchange: move |evt| props.on_toggle.call(evt.value().parse().unwrap_or(false)),
            }
            "{props.label}"
        }
    }
}
