//! Background life/mana bar monitor
//!
//! Polls the configured strips on its own thread, presses the configured
//! keys when a bar drops below its threshold and optionally on a timer.

use super::bar::{BarKind, read_bar};
use crate::config::MonitorConfig;
use crate::desktop::{InputInjector, InputKey, ScreenCapture, ScreenRect};
use crate::error::{ReforgeError, ReforgeResult};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const ERROR_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressReason {
    BelowThreshold { percent: f32, threshold: f32 },
    Timer,
}

impl fmt::Display for PressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressReason::BelowThreshold { percent, threshold } => {
                write!(f, "{percent:.1}% < {threshold:.1}%")
            }
            PressReason::Timer => f.write_str("timer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Latest fill levels; `None` when a strip is unset or not a bar
    Reading { hp: Option<f32>, mp: Option<f32> },
    Pressed {
        bar: BarKind,
        key: InputKey,
        reason: PressReason,
    },
    Error(String),
    Stopped,
}

/// Settings of one bar, resolved from the config
#[derive(Debug, Clone)]
struct BarSettings {
    kind: BarKind,
    region: Option<ScreenRect>,
    key: InputKey,
    threshold: f32,
    disabled: bool,
    timer: Option<Duration>,
}

#[derive(Debug)]
struct BarState {
    settings: BarSettings,
    last_timer: Instant,
}

impl BarState {
    fn read<C: ScreenCapture>(&self, capture: &C) -> ReforgeResult<Option<f32>> {
        let Some(region) = &self.settings.region else {
            return Ok(None);
        };
        let strip = capture.capture(region)?;
        Ok(read_bar(&strip, self.settings.kind))
    }

    /// Presses due for this reading
    fn due_presses(&mut self, reading: Option<f32>, now: Instant) -> Vec<PressReason> {
        let mut presses = Vec::new();
        let Some(percent) = reading else {
            return presses;
        };
        if self.settings.disabled {
            return presses;
        }
        if percent < self.settings.threshold {
            presses.push(PressReason::BelowThreshold {
                percent,
                threshold: self.settings.threshold,
            });
        }
        if let Some(interval) = self.settings.timer
            && now.duration_since(self.last_timer) >= interval
        {
            presses.push(PressReason::Timer);
            self.last_timer = now;
        }
        presses
    }
}

/// One polling step over both bars, independent of any thread
#[derive(Debug)]
pub struct MonitorCycle {
    bars: [BarState; 2],
}

impl MonitorCycle {
    pub fn new(config: &MonitorConfig, start: Instant) -> ReforgeResult<Self> {
        config.validate()?;
        let timer = |enabled: bool, interval: Duration| enabled.then_some(interval);
        let hp = BarSettings {
            kind: BarKind::Life,
            region: config.hp_region,
            key: InputKey::parse(&config.hp_key)?,
            threshold: config.hp_threshold,
            disabled: config.disable_hp,
            timer: timer(config.enable_hp_timer, config.hp_timer_interval()),
        };
        let mp = BarSettings {
            kind: BarKind::Mana,
            region: config.mp_region,
            key: InputKey::parse(&config.mp_key)?,
            threshold: config.mp_threshold,
            disabled: config.disable_mp,
            timer: timer(config.enable_mp_timer, config.mp_timer_interval()),
        };
        Ok(Self {
            bars: [hp, mp].map(|settings| BarState {
                settings,
                last_timer: start,
            }),
        })
    }

    /// Read both bars and press whatever is due
    ///
    /// A bar that cannot be captured reads as `None` and is reported as an
    /// `Error` event; the other bar is still read and pressed.
    pub fn step<C, I>(&mut self, capture: &C, input: &mut I, now: Instant) -> ReforgeResult<Vec<MonitorEvent>>
    where
        C: ScreenCapture,
        I: InputInjector,
    {
        let mut failures = Vec::new();
        let readings = self.bars.each_ref().map(|bar| {
            bar.read(capture).unwrap_or_else(|e| {
                log::warn!("{} bar unreadable: {}", bar.settings.kind, e);
                failures.push(MonitorEvent::Error(format!("{}: {e}", bar.settings.kind)));
                None
            })
        });
        let mut events = vec![MonitorEvent::Reading {
            hp: readings[0],
            mp: readings[1],
        }];
        events.append(&mut failures);

        for (bar, reading) in self.bars.iter_mut().zip(readings) {
            for reason in bar.due_presses(reading, now) {
                input.key_press(bar.settings.key)?;
                log::info!(
                    "{} {} -> pressed '{}'",
                    bar.settings.kind,
                    reason,
                    bar.settings.key
                );
                events.push(MonitorEvent::Pressed {
                    bar: bar.settings.kind,
                    key: bar.settings.key,
                    reason,
                });
            }
        }
        Ok(events)
    }
}

/// Handle to the running monitor thread
pub struct BarMonitor {
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl BarMonitor {
    /// Start polling on a new thread
    ///
    /// `make_input` runs on the worker thread, since desktop input handles
    /// are not always `Send`.
    pub fn start<C, I, F>(
        config: &MonitorConfig,
        capture: C,
        make_input: F,
        events: mpsc::UnboundedSender<MonitorEvent>,
    ) -> ReforgeResult<Self>
    where
        C: ScreenCapture + Send + 'static,
        I: InputInjector,
        F: FnOnce() -> ReforgeResult<I> + Send + 'static,
    {
        let mut cycle = MonitorCycle::new(config, Instant::now())?;
        let interval = config.check_interval();
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let worker = thread::Builder::new()
            .name("bar-monitor".to_string())
            .spawn(move || {
                let mut input = match make_input() {
                    Ok(input) => input,
                    Err(e) => {
                        log::error!("Bar monitor could not open input: {}", e);
                        let _ = events.send(MonitorEvent::Error(e.to_string()));
                        let _ = events.send(MonitorEvent::Stopped);
                        flag.store(false, Ordering::SeqCst);
                        return;
                    }
                };
                log::info!("Bar monitor started");
                while flag.load(Ordering::SeqCst) {
                    match cycle.step(&capture, &mut input, Instant::now()) {
                        Ok(batch) => {
                            for event in batch {
                                if events.send(event).is_err() {
                                    flag.store(false, Ordering::SeqCst);
                                }
                            }
                            thread::sleep(interval);
                        }
                        Err(e) => {
                            log::warn!("Bar monitor error: {}", e);
                            let _ = events.send(MonitorEvent::Error(e.to_string()));
                            thread::sleep(ERROR_BACKOFF);
                        }
                    }
                }
                log::info!("Bar monitor stopped");
                let _ = events.send(MonitorEvent::Stopped);
            })
            .map_err(|source| ReforgeError::WorkerSpawn {
                name: "bar-monitor".to_string(),
                source,
            })?;

        Ok(Self {
            running,
            worker: Some(worker),
        })
    }

    /// Shared flag; clearing it stops the worker after its current step
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stop and wait for the worker thread
    pub fn join(mut self) {
        self.stop();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            log::error!("Bar monitor thread panicked");
        }
    }
}

impl Drop for BarMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
