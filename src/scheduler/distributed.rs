//! Time-distributed request launcher
//!
//! Launches `num_requests` requests at offsets sampled from a probability
//! distribution over a fixed window, with no concurrency cap. Launch order
//! is deterministic (ascending offset); completion order is not. Once the
//! window elapses, remaining launches are skipped; the run simply has a
//! smaller sample, which is not a failure.

use std::sync::Arc;
use std::time::Duration;

use rand_distr::{Distribution, Exp, Normal, Uniform};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use super::{ProgressHook, RunSample};
use crate::config::SpreadMode;
use crate::error::{ConfigError, RequestError};
use crate::metrics::RequestMetrics;
use crate::providers::Provider;

/// Sample `count` launch offsets in seconds from `spread`, clipped to
/// `[0, duration]` and sorted ascending.
pub fn sample_offsets(
    spread: SpreadMode,
    count: usize,
    duration: Duration,
) -> Result<Vec<f64>, ConfigError> {
    let window = duration.as_secs_f64();
    let mut rng = rand::thread_rng();

    let mut offsets: Vec<f64> = match spread {
        SpreadMode::Uniform => {
            let dist = Uniform::new_inclusive(0.0, window);
            (0..count).map(|_| dist.sample(&mut rng)).collect()
        }
        SpreadMode::Normal => {
            let dist = Normal::new(window / 2.0, window / 6.0)
                .map_err(|err| ConfigError::Invalid(format!("normal distribution: {err}")))?;
            (0..count)
                .map(|_| dist.sample(&mut rng).clamp(0.0, window))
                .collect()
        }
        SpreadMode::Exponential => {
            let dist = Exp::new(3.0 / window)
                .map_err(|err| ConfigError::Invalid(format!("exponential distribution: {err}")))?;
            (0..count)
                .map(|_| dist.sample(&mut rng).clamp(0.0, window))
                .collect()
        }
    };

    offsets.sort_by(|a, b| a.total_cmp(b));
    Ok(offsets)
}

/// Run up to `num_requests` requests launched at offsets drawn from `spread`
/// over the `duration` window.
///
/// Every launched request gets the whole window as its own timeout, so the
/// run may outlast the nominal duration while stragglers finish.
pub async fn run_distributed(
    provider: Arc<dyn Provider>,
    num_requests: usize,
    duration: Duration,
    spread: SpreadMode,
    progress: Option<ProgressHook>,
) -> Result<RunSample, ConfigError> {
    let offsets = sample_offsets(spread, num_requests, duration)?;
    tracing::debug!(
        requests = num_requests,
        window_secs = duration.as_secs_f64(),
        %spread,
        "starting distributed run"
    );
    Ok(execute_at_offsets(provider, offsets, duration, progress).await)
}

/// Launch one detached request per offset, cutting off at the window
/// deadline, then await every launched task in order.
async fn execute_at_offsets(
    provider: Arc<dyn Provider>,
    offsets: Vec<f64>,
    duration: Duration,
    progress: Option<ProgressHook>,
) -> RunSample {
    let start = Instant::now();
    let deadline = start + duration;
    let total = offsets.len();

    let mut handles: Vec<JoinHandle<Result<RequestMetrics, RequestError>>> =
        Vec::with_capacity(total);
    for (index, offset) in offsets.into_iter().enumerate() {
        sleep_until(start + Duration::from_secs_f64(offset)).await;
        if Instant::now() >= deadline {
            tracing::debug!(
                launched = handles.len(),
                skipped = total - index,
                "window elapsed, stopping launches"
            );
            break;
        }

        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move { provider.execute(duration).await }));
        if let Some(hook) = &progress {
            hook(handles.len() as u64);
        }
    }

    let attempted = handles.len();
    let mut outcomes = Vec::with_capacity(attempted);
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(metrics)) => outcomes.push(metrics),
            Ok(Err(err)) => tracing::warn!(request = index, error = %err, "request failed"),
            Err(err) if err.is_cancelled() => {
                tracing::debug!(request = index, "request cancelled");
            }
            Err(err) => tracing::error!(request = index, error = %err, "request task failed"),
        }
    }
    let elapsed = start.elapsed();

    RunSample {
        outcomes,
        attempted,
        elapsed,
    }
}
