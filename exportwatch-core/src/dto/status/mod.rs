//! Export status DTOs
//!
//! The export service wraps every answer in a JSend envelope:
//!
//! ```json
//! { "status": "success", "data": { "is_finished": true, "success_count": 12, "failures": [] } }
//! { "status": "error", "message": "Invalid export_id" }
//! ```
//!
//! Older deployments report the finished counts as `success` / `failure`
//! arrays instead of `success_count` / `failures`; both layouts decode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::export::{ExportStatus, FailureRecord};

/// JSend status field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Fail,
    Error,
}

/// Response envelope of `GET /export/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEnvelope {
    /// Absent on services that send a bare `{ "data": ... }` body
    #[serde(default)]
    pub status: Option<EnvelopeStatus>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of a successful status response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusData {
    pub is_finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_count: Option<u64>,
    #[serde(default, alias = "failure", skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<FailureRecord>>,
    /// Older layout: the successfully exported items themselves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<Vec<serde_json::Value>>,
}

/// Why an envelope could not be turned into a status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The service answered with a JSend `error` or `fail`
    #[error("export service rejected the request: {0}")]
    Rejected(String),
    /// The envelope does not carry a usable `data` payload
    #[error("malformed status envelope: {0}")]
    Malformed(String),
}

impl StatusEnvelope {
    /// Converts the envelope into a domain status
    pub fn into_status(self) -> Result<ExportStatus, EnvelopeError> {
        match self.status {
            Some(EnvelopeStatus::Error) | Some(EnvelopeStatus::Fail) => {
                let message = self
                    .message
                    .or_else(|| self.data.as_ref().map(|d| d.to_string()))
                    .unwrap_or_else(|| "export service rejected the request".to_string());
                return Err(EnvelopeError::Rejected(message));
            }
            Some(EnvelopeStatus::Success) | None => {}
        }

        let data = self
            .data
            .ok_or_else(|| EnvelopeError::Malformed("missing `data` field".to_string()))?;

        let data: StatusData = serde_json::from_value(data)
            .map_err(|e| EnvelopeError::Malformed(format!("invalid `data` field: {}", e)))?;

        Ok(data.into())
    }
}

impl From<StatusData> for ExportStatus {
    fn from(data: StatusData) -> Self {
        if !data.is_finished {
            return ExportStatus::Running;
        }

        let success_count = data
            .success_count
            .or_else(|| data.success.as_ref().map(|items| items.len() as u64))
            .unwrap_or(0);

        ExportStatus::Finished {
            success_count,
            failures: data.failures.unwrap_or_default(),
        }
    }
}
