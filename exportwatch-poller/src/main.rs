//! Exportwatch
//!
//! Follows a server-side export job from the terminal until the export
//! service reports it finished, then prints how many items were exported
//! and which ones failed.

mod render;

use anyhow::{Context, Result};
use clap::Parser;
use exportwatch_client::ExportClient;
use exportwatch_core::domain::export::ExportId;
use exportwatch_core::domain::poll::{PollPhase, PollState};
use exportwatch_poller::{Config, StatusPoller};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "exportwatch")]
#[command(about = "Watch an export job until it finishes", long_about = None)]
struct Cli {
    /// Export service URL
    #[arg(long, env = "EXPORTWATCH_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Export job to follow
    #[arg(long, env = "EXPORTWATCH_EXPORT_ID")]
    export_id: String,

    /// Delay between two polls, in milliseconds
    #[arg(long, env = "EXPORTWATCH_POLL_INTERVAL_MS", default_value_t = 5000)]
    poll_interval_ms: u64,

    /// Upper bound for a single status request, in seconds
    #[arg(long, env = "EXPORTWATCH_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Failed polls in a row before giving up (0 retries forever)
    #[arg(long, env = "EXPORTWATCH_MAX_CONSECUTIVE_FAILURES", default_value_t = 5)]
    max_consecutive_failures: u32,

    /// Cap for the retry delay after failed polls, in milliseconds
    #[arg(long, env = "EXPORTWATCH_MAX_BACKOFF_MS", default_value_t = 60_000)]
    max_backoff_ms: u64,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let export_id =
            ExportId::new(self.export_id).context("export id cannot be empty")?;

        let mut config = Config::new(export_id, self.base_url)
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms));
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        config.max_consecutive_failures = self.max_consecutive_failures;
        config.max_backoff = Duration::from_millis(self.max_backoff_ms);

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the rendered progress
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exportwatch_poller=info,exportwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        "Loaded configuration: export_id={}, base_url={}",
        config.export_id, config.base_url
    );

    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let client = Arc::new(ExportClient::with_client(config.base_url.clone(), http_client));

    let export_id = config.export_id.clone();
    let handle = StatusPoller::new(config, client).start();
    let renderer = tokio::spawn(render_progress(handle.subscribe()));

    let mut terminal = handle.subscribe();
    tokio::select! {
        _ = terminal.wait_for(|state| state.is_terminal()) => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping poller");
            handle.shutdown();
        }
    }

    let state = handle.join().await?;
    if let Err(e) = renderer.await {
        warn!("Progress renderer failed: {}", e);
    }

    render::print_summary(&state);

    if state.phase == PollPhase::Failed {
        anyhow::bail!(
            "Export {} could not be tracked: {}",
            export_id,
            state.last_error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}

/// Prints a progress line for every non-terminal state change
async fn render_progress(mut updates: watch::Receiver<PollState>) {
    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        if state.is_terminal() {
            break;
        }
        render::print_progress(&state);
    }
}
