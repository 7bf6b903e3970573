//! Error types for llm-loadgen

use std::time::Duration;

use thiserror::Error;

/// Fatal configuration error.
///
/// Raised while resolving a run configuration, before any request is
/// scheduled. A configuration error aborts the whole run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A spread mode name outside the supported set
    #[error("unknown spread mode `{0}`, expected one of: uniform, normal, exponential")]
    UnknownSpreadMode(String),

    /// The raw configuration document was not valid JSON
    #[error("failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-request failure.
///
/// Recovered locally by the schedulers: the request is logged and counted as
/// failed, and the run continues. There is no retry; a failed request is
/// dropped from the run's sample.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request exceeded its allotted time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Network or protocol failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Transport(err.to_string())
    }
}
