use crate::config::MonitorConfig;
use crate::desktop::{DesktopCapture, DesktopInput, spawn_monitor_hotkey};
use crate::gui::hooks::activity_log::push_log;
use crate::gui::hooks::types::*;
use crate::monitor::{BarMonitor, MonitorEvent};
use dioxus::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

/// Save the config and start the bar monitor
pub fn start_monitor(config: MonitorConfig, save_to: PathBuf, mut signals: MonitorSignals, log: LogSignal) {
    if signals.running.read().is_some() {
        push_log(log, "⚠️ Monitor is already running");
        return;
    }
    if let Err(e) = config.save(&save_to) {
        push_log(log, format!("⚠️ Could not save monitor settings: {e}"));
    }

    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let monitor = match BarMonitor::start(&config, DesktopCapture::new(), DesktopInput::new, event_tx) {
        Ok(monitor) => monitor,
        Err(e) => {
            push_log(log, format!("❌ Monitor not started: {e}"));
            return;
        }
    };
    if let Err(e) = spawn_monitor_hotkey(monitor.running_flag()) {
        push_log(log, format!("⚠️ F12 hotkey unavailable: {e}"));
    }
    signals.running.set(Some(monitor.running_flag()));
    push_log(log, "▶ Monitor started (F12 to stop)");

    spawn(async move {
        // Dropping the handle stops the worker, so it lives as long as this task
        let _monitor = monitor;
        while let Some(event) = event_rx.recv().await {
            match event {
                MonitorEvent::Reading { hp, mp } => {
                    signals.hp.set(hp);
                    signals.mp.set(mp);
                }
                MonitorEvent::Pressed { bar, key, reason } => {
                    push_log(log, format!("💧 {bar} {reason} → '{key}'"));
                }
                MonitorEvent::Error(message) => push_log(log, format!("⚠️ Monitor: {message}")),
                MonitorEvent::Stopped => break,
            }
        }
        signals.running.set(None);
        signals.hp.set(None);
        signals.mp.set(None);
        push_log(log, "⏹ Monitor stopped");
    });
}

pub fn stop_monitor(signals: MonitorSignals) {
    if let Some(flag) = signals.running.read().as_ref() {
        flag.store(false, Ordering::SeqCst);
    }
}
