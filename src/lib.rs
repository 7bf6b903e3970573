//! llm-loadgen - Load generation for streaming LLM endpoints
//!
//! This library issues many concurrent or time-distributed chat-completion
//! requests against an OpenAI-compatible endpoint, measures per-request
//! latency, time-to-first-token, and token throughput, and reduces the raw
//! outcomes to summary statistics.
//!
//! # Architecture
//!
//! - **Providers**: streaming HTTP client for OpenAI-compatible endpoints
//! - **Schedulers**: fixed-concurrency worker pool and time-distributed launcher
//! - **Metrics**: outcome collection and percentile aggregation
//! - **Runner**: orchestrates one configured run into a report
//! - **Prompts**: built-in short and long-context workload catalogs
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use llm_loadgen::{BenchmarkConfig, BenchmarkRunner, OpenAIProvider, RunMode};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BenchmarkConfig::new(
//!         100,
//!         RunMode::Concurrent { concurrency: 10 },
//!         "llama-3-8b",
//!     );
//!     let provider = Arc::new(OpenAIProvider::new(
//!         "http://localhost:8000/v1",
//!         "token",
//!         &config,
//!     ));
//!
//!     let report = BenchmarkRunner::new(provider, config).run().await?;
//!     println!("{} successful requests", report.metrics.successful_requests);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod prompts;
pub mod providers;
pub mod runner;
pub mod scheduler;

// Re-export commonly used types
pub use config::{BenchmarkConfig, RunMode, SpreadMode};
pub use error::{ConfigError, RequestError};
pub use metrics::{AggregatedMetrics, MetricsCollector, RequestMetrics, SeriesStats};
pub use output::JsonExporter;
pub use providers::{OpenAIProvider, Provider};
pub use runner::{BenchmarkReport, BenchmarkRunner};
