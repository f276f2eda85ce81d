//! Life and mana bar monitoring

pub mod bar;
pub mod worker;

pub use bar::{BarKind, fill_percentage, is_valid_bar, read_bar};
pub use worker::{BarMonitor, MonitorCycle, MonitorEvent, PressReason};
