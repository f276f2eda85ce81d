//! Reforge automation: outer loop, channels, reports and result cache

pub mod cache;
pub mod channels;
pub mod report;
pub mod runner;
pub mod types;

pub use cache::{ResultCache, annotate};
pub use channels::create_automation_channels;
pub use match_test::{DEBUG_OUTPUT, MatchTestOutcome, run_match_test};
pub use report::AttemptReport;
pub use runner::ReforgeRunner;
pub use types::{AutomationCommand, AutomationEvent, RunOutcome, RunState, RunSummary};
