//! Benchmark orchestration
//!
//! The runner selects a scheduler from the run mode, wires progress
//! rendering to the schedulers' numeric hook, and reduces the raw sample to
//! a [`BenchmarkReport`].

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::config::{BenchmarkConfig, RunMode, SpreadMode};
use crate::error::ConfigError;
use crate::metrics::{AggregatedMetrics, MetricsCollector};
use crate::providers::Provider;
use crate::scheduler::{concurrent, distributed, ProgressHook, RunSample};

/// Summary of one benchmark run: aggregate statistics plus an echo of the
/// parameters that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// Model the run targeted
    pub model: String,
    /// Requests the configuration asked for
    pub total_requests: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread_mode: Option<SpreadMode>,
    /// Nominal window length of a distributed run, seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_duration: Option<f64>,
    /// Measured end-to-end duration of a distributed run, seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<f64>,
    /// Per-request timeout in effect, seconds
    pub request_timeout: f64,
    pub max_output_tokens: u32,
    pub use_long_context: bool,
    #[serde(flatten)]
    pub metrics: AggregatedMetrics,
}

/// Executes one configured run against a provider.
pub struct BenchmarkRunner {
    provider: Arc<dyn Provider>,
    config: BenchmarkConfig,
    show_progress: bool,
}

impl BenchmarkRunner {
    /// Create a runner for `config` against `provider`.
    pub fn new(provider: Arc<dyn Provider>, config: BenchmarkConfig) -> Self {
        Self {
            provider,
            config,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bar.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Validate the configuration and run it to completion.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] before any request is issued when the
    /// configuration is invalid; per-request failures never surface here.
    pub async fn run(&self) -> Result<BenchmarkReport, ConfigError> {
        self.config.validate()?;

        let (bar, hook) = self.progress_hook();
        let sample = match self.config.mode {
            RunMode::Concurrent { concurrency } => {
                concurrent::run_concurrent(
                    Arc::clone(&self.provider),
                    self.config.num_requests,
                    concurrency,
                    self.config.request_timeout,
                    hook,
                )
                .await
            }
            RunMode::Distributed { duration, spread } => {
                distributed::run_distributed(
                    Arc::clone(&self.provider),
                    self.config.num_requests,
                    duration,
                    spread,
                    hook,
                )
                .await?
            }
        };
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        Ok(self.report(sample))
    }

    fn progress_hook(&self) -> (Option<ProgressBar>, Option<ProgressHook>) {
        if !self.show_progress {
            return (None, None);
        }
        let bar = ProgressBar::new(self.config.num_requests as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .expect("valid progress template")
                .progress_chars("#>-"),
        );
        let hook_bar = bar.clone();
        let hook: ProgressHook = Arc::new(move |done| hook_bar.set_position(done));
        (Some(bar), Some(hook))
    }

    fn report(&self, sample: RunSample) -> BenchmarkReport {
        let mut collector = MetricsCollector::new();
        for outcome in sample.outcomes {
            collector.add(outcome);
        }
        let metrics = collector.aggregate(sample.attempted, sample.elapsed);

        let (concurrency, spread_mode, planned_duration, actual_duration) = match self.config.mode {
            RunMode::Concurrent { concurrency } => (Some(concurrency), None, None, None),
            RunMode::Distributed { duration, spread } => (
                None,
                Some(spread),
                Some(duration.as_secs_f64()),
                Some(sample.elapsed.as_secs_f64()),
            ),
        };

        BenchmarkReport {
            model: self.config.model.clone(),
            total_requests: self.config.num_requests,
            concurrency,
            spread_mode,
            planned_duration,
            actual_duration,
            request_timeout: self.config.effective_timeout().as_secs_f64(),
            max_output_tokens: self.config.max_output_tokens,
            use_long_context: self.config.use_long_context,
            metrics,
        }
    }
}
