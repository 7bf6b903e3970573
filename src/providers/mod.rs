//! Request execution against completion backends
//!
//! The scheduler layers depend only on the [`Provider`] trait, which keeps
//! them testable against stub implementations. The real streaming client
//! lives in [`openai`].

pub mod openai;

pub use openai::OpenAIProvider;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RequestError;
use crate::metrics::RequestMetrics;

/// A backend that can execute one streaming completion request.
///
/// An implementation issues the request, times first-token arrival and full
/// completion, and returns the measurements, or a typed failure that the
/// caller counts without aborting the run.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Issue one streaming request bounded by `timeout`.
    async fn execute(&self, timeout: Duration) -> Result<RequestMetrics, RequestError>;
}
