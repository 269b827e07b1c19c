//! Exportwatch Poller
//!
//! Watches a server-side export job until it finishes.
//!
//! Architecture:
//! - Configuration: which export to follow and how often to ask
//! - Source: where status reports come from (the HTTP client in production)
//! - Scheduler: the poll loop and its observable state
//!
//! The poller waits one interval, asks the export service for the job's
//! status, and repeats until the service reports the export finished. Every
//! state change is published on a watch channel for a view layer to render.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod source;

pub use config::Config;
pub use error::PollerError;
pub use scheduler::{PollOutcome, PollerHandle, StatusPoller};
pub use source::StatusSource;
