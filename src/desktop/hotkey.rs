//! Global stop hotkey, polled on a background thread

use super::types::ScreenPoint;
use crate::automation::AutomationCommand;
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;

pub const STOP_KEY: Keycode = Keycode::F12;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Call `on_press` on every press edge of `key` while `alive` holds
pub fn watch_key<A, F>(key: Keycode, alive: A, mut on_press: F) -> io::Result<JoinHandle<()>>
where
    A: Fn() -> bool + Send + 'static,
    F: FnMut() + Send + 'static,
{
    thread::Builder::new()
        .name(format!("hotkey-{key:?}"))
        .spawn(move || {
            let device = DeviceState::new();
            let mut was_down = false;
            log::debug!("Watching {:?} for stop requests", key);
            while alive() {
                let down = device.get_keys().contains(&key);
                if down && !was_down {
                    log::info!("{:?} pressed, stopping", key);
                    on_press();
                }
                was_down = down;
                thread::sleep(POLL_INTERVAL);
            }
            log::debug!("Hotkey watcher for {:?} stopped", key);
        })
}

/// Current mouse position in screen coordinates
pub fn cursor_position() -> ScreenPoint {
    let (x, y) = DeviceState::new().get_mouse().coords;
    ScreenPoint::new(x, y)
}

/// Send `Stop` on F12 until the run drops its command receiver
pub fn spawn_reforge_hotkey(tx: mpsc::Sender<AutomationCommand>) -> io::Result<JoinHandle<()>> {
    let probe = tx.clone();
    watch_key(
        STOP_KEY,
        move || !probe.is_closed(),
        move || {
            if let Err(e) = tx.try_send(AutomationCommand::Stop) {
                log::debug!("Stop not delivered: {}", e);
            }
        },
    )
}

/// Clear `running` on F12; the watcher ends with the monitor
pub fn spawn_monitor_hotkey(running: Arc<AtomicBool>) -> io::Result<JoinHandle<()>> {
    let probe = running.clone();
    watch_key(
        STOP_KEY,
        move || probe.load(Ordering::SeqCst),
        move || running.store(false, Ordering::SeqCst),
    )
}
