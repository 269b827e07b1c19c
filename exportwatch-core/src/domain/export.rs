//! Export domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single failed item reported by the export service.
///
/// The poller never inspects these; they are carried through to the view
/// layer exactly as received.
pub type FailureRecord = serde_json::Value;

/// Identifier of an export job
///
/// Opaque to the watcher. The service hands it out when the export is
/// scheduled and it stays fixed for the lifetime of a poller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportId(String);

impl ExportId {
    /// Creates an export id, rejecting empty or whitespace-only values
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of an export job as reported by one poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportStatus {
    /// The job is still running
    Running,
    /// The job is done; counts are final
    Finished {
        success_count: u64,
        failures: Vec<FailureRecord>,
    },
}

impl ExportStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}
