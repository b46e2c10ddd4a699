use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Network,
    Server,
    MalformedResponse,
    Timeout,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Server => "server",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::Timeout => "timeout",
        }
    }
}

/// Error body the backend attaches to non-success responses, e.g. `{"detail": "..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {status}{}", detail_suffix(.detail))]
    Server { status: u16, detail: Option<String> },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) => FailureKind::Network,
            FetchError::Server { .. } => FailureKind::Server,
            FetchError::MalformedResponse(_) => FailureKind::MalformedResponse,
            FetchError::Timeout(_) => FailureKind::Timeout,
        }
    }
}
