// gui/mod.rs
//! GUI module root for reforge-assist

pub mod util;
mod components {
    pub mod fields;
    pub mod header;
    pub mod log_panel;
    pub mod match_test_panel;
    pub mod monitor_panel;
    pub mod reforge_panel;
}
pub mod dioxus_app; // main app
pub mod hooks;

pub use dioxus_app::run_gui;
pub use hooks::ConfigPaths;
