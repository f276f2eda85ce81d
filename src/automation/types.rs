//! Types and enums for the reforge automation

use super::report::AttemptReport;
use crate::template_matching::Verdict;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Preparing,
    Attempting(u32),
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AutomationCommand {
    Stop,
}

#[derive(Debug, Clone)]
pub enum AutomationEvent {
    StateChanged(RunState),
    Attempt(AttemptReport),
    CacheSaved(PathBuf),
    Error(String),
    Finished(RunSummary),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    AttemptCapReached,
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => f.write_str("success"),
            RunOutcome::AttemptCapReached => f.write_str("attempt cap reached"),
            RunOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    /// Attempts started, including ones that failed on capture or input
    pub attempts: u32,
    /// Verdict of the last attempt, `None` if it never reached matching
    pub last_verdict: Option<Verdict>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match &self.last_verdict {
            Some(v) if v.success => "PASS",
            Some(_) => "FAIL",
            None => "none",
        };
        write!(
            f,
            "Run ended: {} after {} attempt(s), final verdict {}",
            self.outcome, self.attempts, verdict
        )
    }
}
