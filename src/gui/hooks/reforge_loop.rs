use crate::automation::{
    AutomationCommand, AutomationEvent, ReforgeRunner, RunState, create_automation_channels,
};
use crate::config::ReforgeConfig;
use crate::desktop::{DesktopCapture, DesktopInput, spawn_reforge_hotkey};
use crate::gui::hooks::activity_log::push_log;
use crate::gui::hooks::types::*;
use dioxus::prelude::*;
use std::path::PathBuf;

/// Save the config and start a reforge run on a worker thread
///
/// Events from the worker are folded into the signals until the worker
/// drops its sender.
pub fn start_reforge(config: ReforgeConfig, save_to: PathBuf, mut signals: ReforgeSignals, log: LogSignal) {
    if signals.command_tx.read().is_some() {
        push_log(log, "⚠️ A run is already active");
        return;
    }
    if let Err(e) = config.save(&save_to) {
        push_log(log, format!("⚠️ Could not save settings: {e}"));
    }

    let (cmd_tx, cmd_rx, event_tx, mut event_rx) = create_automation_channels();
    signals.command_tx.set(Some(cmd_tx.clone()));
    signals.state.set(RunState::Preparing);

    if let Err(e) = spawn_reforge_hotkey(cmd_tx) {
        push_log(log, format!("⚠️ F12 hotkey unavailable: {e}"));
    }

    let worker_events = event_tx.clone();
    let spawned = std::thread::Builder::new()
        .name("reforge-run".to_string())
        .spawn(move || {
            let started = DesktopInput::new().and_then(|input| {
                ReforgeRunner::new(&config, DesktopCapture::new(), input, cmd_rx)
            });
            match started {
                Ok(runner) => {
                    // Failures are reported through the event channel
                    let _ = runner.with_events(worker_events).run();
                }
                Err(e) => {
                    log::error!("Reforge setup failed: {}", e);
                    let _ = worker_events.send(AutomationEvent::Error(format!("setup: {e}")));
                }
            }
        });
    drop(event_tx);
    if let Err(e) = spawned {
        push_log(log, format!("❌ Could not start worker: {e}"));
        signals.command_tx.set(None);
        signals.state.set(RunState::Idle);
        return;
    }
    push_log(log, "▶ Reforge started (F12 to stop)");

    spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                AutomationEvent::StateChanged(state) => signals.state.set(state),
                AutomationEvent::Attempt(report) => {
                    let line = report.summary_line();
                    push_log(log, &line);
                    signals.last_summary.set(Some(line));
                }
                AutomationEvent::CacheSaved(path) => {
                    log::debug!("GUI: cached {}", path.display());
                }
                AutomationEvent::Error(message) => push_log(log, format!("⚠️ {message}")),
                AutomationEvent::Finished(summary) => push_log(log, format!("⏹ {summary}")),
            }
        }
        signals.command_tx.set(None);
        signals.state.set(RunState::Idle);
    });
}

/// Ask the active run to stop at the next attempt boundary
pub fn stop_reforge(signals: ReforgeSignals, log: LogSignal) {
    let tx = signals.command_tx.read().clone();
    match tx {
        Some(tx) => {
            if tx.try_send(AutomationCommand::Stop).is_err() {
                push_log(log, "⚠️ Stop request could not be delivered");
            } else {
                push_log(log, "⏳ Stopping after the current attempt...");
            }
        }
        None => push_log(log, "No run is active"),
    }
}
