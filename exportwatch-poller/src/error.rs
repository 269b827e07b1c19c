//! Error types for the poller

use exportwatch_client::ClientError;
use thiserror::Error;

/// Errors surfaced by the status poller
#[derive(Debug, Error)]
pub enum PollerError {
    /// A status poll failed
    #[error("status poll failed: {0}")]
    Poll(#[from] ClientError),

    /// The polling task panicked or was aborted
    #[error("poller task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
