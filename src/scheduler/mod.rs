//! Benchmark schedulers
//!
//! Two execution strategies over the same [`Provider`](crate::providers::Provider) seam:
//!
//! - [`concurrent`]: a fixed worker pool that runs exactly N requests with at
//!   most K in flight at once
//! - [`distributed`]: launches N requests at offsets sampled from a
//!   probability distribution over a fixed window, with no concurrency cap
//!
//! Both report progress through a plain numeric hook so that rendering stays
//! out of the core.

pub mod concurrent;
pub mod distributed;

use std::sync::Arc;
use std::time::Duration;

use crate::metrics::RequestMetrics;

/// Progress callback.
///
/// Invoked with the running count of finished attempts (concurrent mode) or
/// launched requests (distributed mode).
pub type ProgressHook = Arc<dyn Fn(u64) + Send + Sync>;

/// Outcome collection plus run accounting produced by a scheduler.
#[derive(Debug)]
pub struct RunSample {
    /// Outcomes of requests that completed successfully
    pub outcomes: Vec<RequestMetrics>,
    /// Requests actually attempted; below the requested count only when a
    /// distributed run's window closed early
    pub attempted: usize,
    /// Wall time from the first scheduling decision to the last completion
    pub elapsed: Duration,
}
