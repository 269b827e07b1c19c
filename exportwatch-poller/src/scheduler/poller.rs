//! Export status poller
//!
//! Polls the export service until the export reports finished, then stops.
//! Requests are strictly sequential: the next poll is only scheduled once
//! the previous response has been handled.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::PollerError;
use crate::source::StatusSource;
use exportwatch_core::domain::poll::PollState;

/// Result of a single status check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The export is still running; poll again later
    Pending,
    /// The poller is in a terminal state; nothing more to do
    Complete,
}

/// Polls one export job until it finishes
pub struct StatusPoller {
    config: Config,
    source: Arc<dyn StatusSource>,
    state: watch::Sender<PollState>,
}

impl StatusPoller {
    /// Creates a new poller in the `Polling` phase
    pub fn new(config: Config, source: Arc<dyn StatusSource>) -> Self {
        let (state, _) = watch::channel(PollState::new());
        Self {
            config,
            source,
            state,
        }
    }

    /// Subscribes to state changes
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Spawns the polling loop
    ///
    /// The first poll happens one interval after this call.
    pub fn start(self) -> PollerHandle {
        let state = self.subscribe();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move { self.run(shutdown_rx).await });

        PollerHandle {
            state,
            shutdown,
            task,
        }
    }

    /// Runs the polling loop until a terminal state or shutdown
    ///
    /// Shutdown is signalled by sending `true` on, or dropping the sender
    /// of, `shutdown`. Returns the final state.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> PollState {
        info!(
            "Watching export {} (interval: {:?})",
            self.config.export_id, self.config.poll_interval
        );

        let mut delay = self.config.poll_interval;

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown.changed() => {
                    info!("Poller for export {} cancelled", self.config.export_id);
                    break;
                }
            }

            let result = tokio::select! {
                result = self.check_status() => result,
                _ = shutdown.changed() => {
                    info!("Poller for export {} cancelled mid-request", self.config.export_id);
                    break;
                }
            };

            match result {
                Ok(PollOutcome::Complete) => break,
                Ok(PollOutcome::Pending) => {
                    delay = self.config.poll_interval;
                }
                Err(e) => {
                    let failures = self.state.borrow().consecutive_failures;

                    if self.config.gives_up_after(failures) {
                        error!(
                            "Giving up on export {} after {} failed polls: {}",
                            self.config.export_id, failures, e
                        );
                        self.state.send_modify(|state| state.fail());
                        break;
                    }

                    delay = self.config.backoff_delay(failures);
                    warn!(
                        "Poll {} for export {} failed: {}; retrying in {:?}",
                        failures, self.config.export_id, e, delay
                    );
                }
            }
        }

        self.state()
    }

    /// Performs a single status check
    ///
    /// Issues exactly one request unless the poller is already terminal, in
    /// which case nothing is sent and `Complete` is returned. A failed
    /// request is recorded in the state before the error is returned.
    pub async fn check_status(&self) -> Result<PollOutcome, PollerError> {
        if self.state.borrow().is_terminal() {
            return Ok(PollOutcome::Complete);
        }

        debug!("Polling status of export {}", self.config.export_id);

        match self.source.fetch_status(&self.config.export_id).await {
            Ok(status) => {
                let mut finished = false;
                self.state.send_modify(|state| finished = state.apply_status(status));

                if finished {
                    let state = self.state.borrow();
                    info!(
                        "Export {} finished: {} succeeded, {} failed",
                        self.config.export_id,
                        state.success_count,
                        state.fails.len()
                    );
                    Ok(PollOutcome::Complete)
                } else {
                    debug!("Export {} still running", self.config.export_id);
                    Ok(PollOutcome::Pending)
                }
            }
            Err(e) => {
                let message = if e.is_timeout() {
                    format!("request timed out after {:?}: {}", self.config.request_timeout, e)
                } else {
                    e.to_string()
                };
                self.state.send_modify(|state| {
                    state.record_failure(message);
                });
                Err(e.into())
            }
        }
    }
}

/// Handle to a spawned poller
///
/// Dropping the handle cancels the poller.
pub struct PollerHandle {
    state: watch::Receiver<PollState>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<PollState>,
}

impl PollerHandle {
    /// Subscribes to state changes
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Asks the poller to stop at its next await point
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Waits for the poller to stop and returns its final state
    pub async fn join(self) -> Result<PollState, PollerError> {
        let PollerHandle {
            task,
            shutdown: _shutdown,
            ..
        } = self;

        Ok(task.await?)
    }
}
