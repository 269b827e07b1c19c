//! Status source
//!
//! The poller only needs one thing from the outside world: the current
//! status of an export. Keeping that behind a trait lets the scheduler run
//! against the HTTP client in production and a scripted source in tests.

use async_trait::async_trait;
use exportwatch_client::{ClientError, ExportClient};
use exportwatch_core::domain::export::{ExportId, ExportStatus};

/// Source of export status reports
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches the current status of an export
    ///
    /// One call issues at most one request.
    async fn fetch_status(&self, export_id: &ExportId) -> Result<ExportStatus, ClientError>;
}

#[async_trait]
impl StatusSource for ExportClient {
    async fn fetch_status(&self, export_id: &ExportId) -> Result<ExportStatus, ClientError> {
        self.export_status(export_id).await
    }
}
