use crate::automation::{AutomationCommand, RunState};
use crate::config::{MonitorConfig, ReforgeConfig};
use dioxus::prelude::Signal;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Automation command sender of the active run
pub type CommandTxSignal = Signal<Option<tokio::sync::mpsc::Sender<AutomationCommand>>>;

/// Log lines shown in the log panel, oldest first
pub type LogSignal = Signal<Vec<String>>;

pub const MAX_LOG_LINES: usize = 300;

/// Where the two config documents live
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPaths {
    pub reforge: PathBuf,
    pub monitor: PathBuf,
}

/// Reforge loop signals grouped together
#[derive(Clone, Copy, PartialEq)]
pub struct ReforgeSignals {
    pub config: Signal<ReforgeConfig>,
    pub state: Signal<RunState>,
    pub command_tx: CommandTxSignal,
    pub last_summary: Signal<Option<String>>, // one-line form of the latest attempt
}

/// Bar monitor signals grouped together
#[derive(Clone, Copy, PartialEq)]
pub struct MonitorSignals {
    pub config: Signal<MonitorConfig>,
    pub hp: Signal<Option<f32>>,
    pub mp: Signal<Option<f32>>,
    pub running: Signal<Option<Arc<AtomicBool>>>, // set while the worker runs
}
