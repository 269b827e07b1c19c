//! Scheduler layer
//!
//! Drives the poll loop for a single export job: when to ask the export
//! service for the job's status, when to retry and when to stop.

pub mod poller;

pub use poller::{PollOutcome, PollerHandle, StatusPoller};
