use crate::automation::RunState;
use crate::config::{MonitorConfig, ReforgeConfig};
use crate::gui::components::{
    header::Header, log_panel::LogPanel, match_test_panel::MatchTestPanel,
    monitor_panel::MonitorPanel, reforge_panel::ReforgePanel,
};
use crate::gui::hooks::{ConfigPaths, MonitorSignals, ReforgeSignals, push_log, stop_monitor};
use dioxus::prelude::*;
use std::sync::OnceLock;

static CONFIG_PATHS: OnceLock<ConfigPaths> = OnceLock::new();

fn config_paths() -> ConfigPaths {
    CONFIG_PATHS.get().cloned().unwrap_or_else(|| ConfigPaths {
        reforge: crate::config::DEFAULT_REFORGE_CONFIG.into(),
        monitor: crate::config::DEFAULT_MONITOR_CONFIG.into(),
    })
}

pub fn run_gui(paths: ConfigPaths) {
    use dioxus::desktop::{Config, WindowBuilder};
    if CONFIG_PATHS.set(paths).is_err() {
        log::warn!("GUI config paths were already set");
    }
    let enable_borderless = true; // borderless window
    let config = Config::new().with_window(
        WindowBuilder::new()
            .with_title("Reforge Assist")
            .with_decorations(!enable_borderless) // false => no native title/menu
            .with_resizable(true)
            .with_inner_size(dioxus::desktop::LogicalSize::new(1100, 760)),
    );
    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .launch(App);
}

#[component]
fn App() -> Element {
    use dioxus::desktop::use_window; // access desktop window for dragging
    let desktop = use_window();
    let paths = use_hook(config_paths);
    let log = use_signal(Vec::<String>::new);

    let reforge = ReforgeSignals {
        config: use_signal(|| ReforgeConfig::default()),
        state: use_signal(|| RunState::Idle),
        command_tx: use_signal(|| None),
        last_summary: use_signal(|| None::<String>),
    };
    let monitor = MonitorSignals {
        config: use_signal(|| MonitorConfig::default()),
        hp: use_signal(|| None::<f32>),
        mp: use_signal(|| None::<f32>),
        running: use_signal(|| None),
    };

    // Load both config documents once on first render
    let load_paths = paths.clone();
    use_effect(move || {
        let mut reforge_config = reforge.config;
        let mut monitor_config = monitor.config;
        let paths = load_paths.clone();
        spawn(async move {
            match ReforgeConfig::load(&paths.reforge) {
                Ok(c) => {
                    reforge_config.set(c);
                    push_log(log, format!("📂 Reforge settings from {}", paths.reforge.display()));
                }
                Err(e) => push_log(log, format!("❌ {e}; using defaults")),
            }
            match MonitorConfig::load(&paths.monitor) {
                Ok(c) => {
                    monitor_config.set(c);
                    push_log(log, format!("📂 Monitor settings from {}", paths.monitor.display()));
                }
                Err(e) => push_log(log, format!("❌ {e}; using defaults")),
            }
        });
    });

    let status = match &*reforge.state.read() {
        RunState::Idle | RunState::Finished => {
            if monitor.running.read().is_some() { "Monitoring".to_string() } else { "Ready".to_string() }
        }
        RunState::Preparing => "Preparing".to_string(),
        RunState::Attempting(n) => format!("Attempt {n}"),
    };

    rsx! {
        // Main app container: vertical layout, fills viewport
        div { style: "height:97vh; display:flex; flex-direction:column; background:linear-gradient(135deg,#3a1c71 0%,#d76d77 60%,#ffaf7b 100%); color:white; border:1px solid rgba(255,255,255,0.25); box-sizing:content-box;",
            div { style: "flex:1; overflow:auto; padding:8px; display:flex; flex-direction:column; gap:10px;",
                Header {
                    status: status,
                    on_drag: move |_| { let _ = desktop.window.drag_window(); },
                    on_close: move |_| {
                        stop_monitor(monitor);
                        std::thread::spawn(|| std::process::exit(0));
                    },
                }
                // Left: reforge settings, right: monitor and match test
                div { style: "display:flex; gap:14px; align-items:flex-start;",
                    div { style: "flex:1; min-width:0;",
                        ReforgePanel { signals: reforge, log: log, config_path: paths.reforge.clone() }
                    }
                    div { style: "flex:1; min-width:0; display:flex; flex-direction:column; gap:10px;",
                        MonitorPanel { signals: monitor, log: log, config_path: paths.monitor.clone() }
                        MatchTestPanel { config: reforge.config, log: log }
                    }
                }
                LogPanel { log: log }
                div { style: "margin-top:4px; text-align:left; font-size:0.7em; opacity:0.75; letter-spacing:0.5px;", "Built with Rust 🦀 and Dioxus ⚛️ · F12 stops any running task" }
            }
        }
    }
}
