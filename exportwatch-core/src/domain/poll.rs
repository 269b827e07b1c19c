//! Poll state
//!
//! The state a watcher keeps about one export job. It is created in the
//! `Polling` phase and leaves it exactly once, either to `Done` (the service
//! reported the export finished) or to `Failed` (the watcher gave up after
//! too many failed polls).

use serde::{Deserialize, Serialize};

use super::export::{ExportStatus, FailureRecord};

/// Lifecycle phase of a poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollPhase {
    Polling,
    Done,
    Failed,
}

impl PollPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Polling)
    }
}

/// Observable state of a single export watch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollState {
    pub phase: PollPhase,
    /// True until a terminal state is reached
    pub is_exporting: bool,
    /// Items exported successfully; only set from the finishing response
    pub success_count: u64,
    /// Failed items; only set from the finishing response
    pub fails: Vec<FailureRecord>,
    /// Polls completed, successful or not
    pub polls: u64,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PollState {
    pub fn new() -> Self {
        Self {
            phase: PollPhase::Polling,
            is_exporting: true,
            success_count: 0,
            fails: Vec::new(),
            polls: 0,
            consecutive_failures: 0,
            last_error: None,
            finished_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Folds a successful poll response into the state
    ///
    /// Returns true if this response moved the state into `Done`. Responses
    /// arriving after a terminal transition are ignored.
    pub fn apply_status(&mut self, status: ExportStatus) -> bool {
        if self.is_terminal() {
            return false;
        }

        self.polls += 1;
        self.consecutive_failures = 0;
        self.last_error = None;

        match status {
            ExportStatus::Running => false,
            ExportStatus::Finished {
                success_count,
                failures,
            } => {
                self.phase = PollPhase::Done;
                self.is_exporting = false;
                self.success_count = success_count;
                self.fails = failures;
                self.finished_at = Some(chrono::Utc::now());
                true
            }
        }
    }

    /// Records a failed poll and returns the consecutive failure count
    pub fn record_failure(&mut self, message: impl Into<String>) -> u32 {
        if self.is_terminal() {
            return self.consecutive_failures;
        }

        self.polls += 1;
        self.consecutive_failures += 1;
        self.last_error = Some(message.into());
        self.consecutive_failures
    }

    /// Gives up on the export; counts stay as they are
    pub fn fail(&mut self) {
        if self.is_terminal() {
            return;
        }

        self.phase = PollPhase::Failed;
        self.is_exporting = false;
        self.finished_at = Some(chrono::Utc::now());
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self::new()
    }
}
