//! Fixed-concurrency worker pool
//!
//! Runs exactly `num_requests` attempts with at most `concurrency` in flight
//! at any instant. Work is distributed through a FIFO channel pre-loaded
//! with one task id per request followed by one shutdown sentinel per
//! worker, so every worker drains to its own sentinel and exits without
//! polling a shared flag. The counting semaphore is the sole mechanism
//! bounding in-flight requests; task ids are dequeued in order but
//! completion order is unconstrained.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Mutex, Semaphore};

use super::{ProgressHook, RunSample};
use crate::providers::Provider;

/// Run `num_requests` attempts through a pool of `concurrency` workers.
///
/// Failed requests are logged and dropped from the outcome collection; the
/// returned sample always has `attempted == num_requests`.
pub async fn run_concurrent(
    provider: Arc<dyn Provider>,
    num_requests: usize,
    concurrency: usize,
    request_timeout: Duration,
    progress: Option<ProgressHook>,
) -> RunSample {
    let (queue_tx, queue_rx) = mpsc::unbounded_channel::<Option<usize>>();
    for task_id in 0..num_requests {
        let _ = queue_tx.send(Some(task_id));
    }
    // One sentinel per worker tells each loop, exactly once, to stop.
    for _ in 0..concurrency {
        let _ = queue_tx.send(None);
    }
    drop(queue_tx);

    let queue = Arc::new(Mutex::new(queue_rx));
    let gate = Arc::new(Semaphore::new(concurrency));
    let outcomes = Arc::new(Mutex::new(Vec::with_capacity(num_requests)));
    let finished = Arc::new(AtomicU64::new(0));

    let start = Instant::now();
    let mut workers = Vec::with_capacity(concurrency);
    for worker_id in 0..concurrency {
        let provider = Arc::clone(&provider);
        let queue = Arc::clone(&queue);
        let gate = Arc::clone(&gate);
        let outcomes = Arc::clone(&outcomes);
        let finished = Arc::clone(&finished);
        let progress = progress.clone();

        workers.push(tokio::spawn(async move {
            loop {
                let permit = gate
                    .acquire()
                    .await
                    .expect("admission gate is never closed");
                let item = queue.lock().await.recv().await;
                let task_id = match item {
                    Some(Some(task_id)) => task_id,
                    // Sentinel, or channel drained: this worker is done.
                    Some(None) | None => {
                        drop(permit);
                        break;
                    }
                };

                tracing::debug!(worker_id, task_id, "starting request");
                match provider.execute(request_timeout).await {
                    Ok(metrics) => outcomes.lock().await.push(metrics),
                    Err(err) => {
                        tracing::warn!(worker_id, task_id, error = %err, "request failed");
                    }
                }

                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(hook) = &progress {
                    hook(done);
                }
                drop(permit);
            }
        }));
    }

    for worker in workers {
        if let Err(err) = worker.await {
            tracing::error!(error = %err, "worker task failed");
        }
    }
    let elapsed = start.elapsed();

    let outcomes = Arc::try_unwrap(outcomes)
        .expect("all workers have exited")
        .into_inner();

    RunSample {
        outcomes,
        attempted: num_requests,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use crate::metrics::RequestMetrics;

    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Stub provider that tracks how many executions overlap.
    struct MockProvider {
        delay: Option<Duration>,
        fail_every: Option<usize>,
        calls: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                delay: None,
                fail_every: None,
                calls: AtomicUsize::new(0),
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn with_fail_every(mut self, n: usize) -> Self {
            self.fail_every = Some(n);
            self
        }

        fn max_active(&self) -> usize {
            self.max_active.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn execute(&self, _timeout: Duration) -> Result<RequestMetrics, RequestError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now_active, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);

            if let Some(n) = self.fail_every {
                if call % n == n - 1 {
                    return Err(RequestError::Transport("simulated failure".to_string()));
                }
            }

            Ok(RequestMetrics {
                output_tokens: 50,
                elapsed: Duration::from_millis(100),
                tokens_per_second: 500.0,
                ttft: Some(Duration::from_millis(20)),
            })
        }
    }

    #[tokio::test]
    async fn test_runs_exactly_num_requests() {
        let provider = Arc::new(MockProvider::new());
        let sample = run_concurrent(provider, 10, 3, Duration::from_secs(5), None).await;

        assert_eq!(sample.attempted, 10);
        assert_eq!(sample.outcomes.len(), 10);
    }

    #[tokio::test]
    async fn test_in_flight_requests_never_exceed_concurrency() {
        let provider = Arc::new(MockProvider::new().with_delay(Duration::from_millis(10)));
        let sample =
            run_concurrent(Arc::clone(&provider) as _, 20, 3, Duration::from_secs(5), None).await;

        assert_eq!(sample.outcomes.len(), 20);
        assert!(
            provider.max_active() <= 3,
            "observed {} concurrent executions",
            provider.max_active()
        );
    }

    #[tokio::test]
    async fn test_pool_genuinely_overlaps_requests() {
        let provider = Arc::new(MockProvider::new().with_delay(Duration::from_millis(30)));
        run_concurrent(Arc::clone(&provider) as _, 8, 4, Duration::from_secs(5), None).await;

        assert!(
            provider.max_active() > 1,
            "expected overlapping executions, got {}",
            provider.max_active()
        );
    }

    #[tokio::test]
    async fn test_failures_are_counted_but_not_collected() {
        let provider = Arc::new(MockProvider::new().with_fail_every(2));
        let sample = run_concurrent(provider, 10, 2, Duration::from_secs(5), None).await;

        assert_eq!(sample.attempted, 10);
        assert_eq!(sample.outcomes.len(), 5);
    }

    #[tokio::test]
    async fn test_progress_hook_reaches_total() {
        let provider = Arc::new(MockProvider::new());
        let seen = Arc::new(AtomicU64::new(0));
        let hook_seen = Arc::clone(&seen);
        let hook: ProgressHook = Arc::new(move |done| {
            hook_seen.fetch_max(done, Ordering::SeqCst);
        });

        run_concurrent(provider, 12, 4, Duration::from_secs(5), Some(hook)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_single_worker_runs_sequentially() {
        let provider = Arc::new(MockProvider::new().with_delay(Duration::from_millis(5)));
        let sample =
            run_concurrent(Arc::clone(&provider) as _, 5, 1, Duration::from_secs(5), None).await;

        assert_eq!(sample.outcomes.len(), 5);
        assert_eq!(provider.max_active(), 1);
    }
}
