//! CLI argument parsing and command handling

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::config::{parse_raw_configs, BenchmarkConfig, RunMode};
use crate::output::JsonExporter;
use crate::providers::OpenAIProvider;
use crate::runner::{BenchmarkReport, BenchmarkRunner};

const DEFAULT_CONFIG: &str = r#"{"num_requests": 100, "concurrency": 10, "output_tokens": 100}"#;

/// Load-generation benchmark for streaming completion endpoints
#[derive(Parser, Debug)]
#[command(name = "llm-loadgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the completion endpoint (e.g. http://localhost:8000/v1)
    #[arg(long)]
    pub base_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model identifier sent with every request
    #[arg(long)]
    pub model: String,

    /// Use (context, prompt) pairs instead of the short-prompt catalog
    #[arg(long)]
    pub use_long_context: bool,

    /// Run configuration: inline JSON (object or array) or a path to a JSON file
    #[arg(long)]
    pub config: Option<String>,

    /// File the JSON results are written to
    #[arg(long, default_value = "benchmark_results.json")]
    pub output_file: String,

    /// Seconds to pause between runs so the server settles
    #[arg(long, default_value_t = 5)]
    pub cooldown_secs: u64,

    /// Reduce log output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Resolve all run configurations up front.
    ///
    /// Any configuration error (bad JSON, a missing field, an unknown
    /// spread mode) aborts here, before the first request is issued.
    pub fn configs(&self) -> Result<Vec<BenchmarkConfig>> {
        let document = self.config.as_deref().unwrap_or(DEFAULT_CONFIG);

        // The flag value is either inline JSON or a path to a JSON file.
        let raw = match parse_raw_configs(document) {
            Ok(raw) => raw,
            Err(_) if Path::new(document).exists() => {
                let text = std::fs::read_to_string(document)
                    .with_context(|| format!("failed to read config file {document}"))?;
                parse_raw_configs(&text)
                    .with_context(|| format!("invalid config file {document}"))?
            }
            Err(err) => {
                return Err(err)
                    .context("--config is neither valid JSON nor a path to a readable file")
            }
        };

        if raw.is_empty() {
            bail!("config document contains no runs");
        }

        raw.into_iter()
            .map(|entry| {
                entry
                    .into_config(&self.model, self.use_long_context)
                    .map_err(Into::into)
            })
            .collect()
    }

    /// Run every configured benchmark sequentially and write the results.
    pub async fn run(&self) -> Result<()> {
        let configs = self.configs()?;
        tracing::info!(runs = configs.len(), model = %self.model, "starting benchmark");

        let mut reports = Vec::with_capacity(configs.len());
        for (index, config) in configs.iter().enumerate() {
            println!(
                "Run {}/{}: {}",
                index + 1,
                configs.len(),
                describe(config)
            );

            let provider = Arc::new(OpenAIProvider::new(&self.base_url, &self.api_key, config));
            let runner = BenchmarkRunner::new(provider, config.clone());
            let report = runner.run().await?;
            print_report(&report);
            reports.push(report);

            if index + 1 < configs.len() && self.cooldown_secs > 0 {
                println!("Cooling down for {}s...", self.cooldown_secs);
                tokio::time::sleep(Duration::from_secs(self.cooldown_secs)).await;
            }
        }

        if reports.len() > 1 {
            print_comparison(&reports);
        }

        JsonExporter::export(&reports, Path::new(&self.output_file))?;
        println!("Results saved to {}", self.output_file);
        Ok(())
    }
}

fn describe(config: &BenchmarkConfig) -> String {
    match config.mode {
        RunMode::Concurrent { concurrency } => {
            format!("{} requests, concurrency {}", config.num_requests, concurrency)
        }
        RunMode::Distributed { duration, spread } => format!(
            "{} requests over {:.0}s, {} spread",
            config.num_requests,
            duration.as_secs_f64(),
            spread
        ),
    }
}

fn print_report(report: &BenchmarkReport) {
    let metrics = &report.metrics;
    let success_rate = if metrics.attempted_requests > 0 {
        metrics.successful_requests as f64 / metrics.attempted_requests as f64 * 100.0
    } else {
        0.0
    };

    println!();
    println!("{}", "=".repeat(70));
    println!("   Benchmark Results: {}", report.model);
    println!("{}", "=".repeat(70));
    println!("  Requested:            {}", report.total_requests);
    println!(
        "  Attempted:            {} ({} successful, {} failed, {:.1}%)",
        metrics.attempted_requests,
        metrics.successful_requests,
        metrics.failed_requests,
        success_rate
    );
    if let Some(concurrency) = report.concurrency {
        println!("  Concurrency:          {concurrency}");
    }
    if let (Some(spread), Some(actual)) = (report.spread_mode, report.actual_duration) {
        println!("  Spread:               {spread}");
        println!("  Actual duration:      {actual:.2}s");
    }
    println!("  Requests/second:      {:.2}", metrics.requests_per_second);
    println!("  Output tokens:        {}", metrics.total_output_tokens);
    println!();
    print_series("Latency (s)", &metrics.latency);
    print_series("Tokens/second", &metrics.tokens_per_second);
    print_series("TTFT (s)", &metrics.time_to_first_token);
    println!("{}", "=".repeat(70));
    println!();
}

fn print_series(label: &str, stats: &crate::metrics::SeriesStats) {
    println!(
        "  {:<20}  avg {:>8.3}  p50 {}  p95 {}  p99 {}",
        label,
        stats.average,
        fmt_opt(stats.p50),
        fmt_opt(stats.p95),
        fmt_opt(stats.p99)
    );
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:>8.3}"),
        None => format!("{:>8}", "n/a"),
    }
}

fn print_comparison(reports: &[BenchmarkReport]) {
    println!();
    println!(
        "{:<24} {:>6} {:>9} {:>7} {:>9} {:>9} {:>9} {:>10} {:>10}",
        "Mode", "Total", "Success", "Req/s", "Lat avg", "Lat p95", "TTFT avg", "Tok/s avg", "Tok/s p95"
    );
    for report in reports {
        let metrics = &report.metrics;
        let mode = match (report.concurrency, report.spread_mode) {
            (Some(concurrency), _) => format!("concurrency {concurrency}"),
            (None, Some(spread)) => format!("{spread} ({} reqs)", report.total_requests),
            (None, None) => "-".to_string(),
        };
        let success_rate = if metrics.attempted_requests > 0 {
            metrics.successful_requests as f64 / metrics.attempted_requests as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "{:<24} {:>6} {:>8.1}% {:>7.2} {:>9.3} {:>9} {:>9} {:>10.2} {:>10}",
            mode,
            report.total_requests,
            success_rate,
            metrics.requests_per_second,
            metrics.latency.average,
            fmt_opt(metrics.latency.p95).trim_start(),
            format!("{:.3}", metrics.time_to_first_token.average),
            metrics.tokens_per_second.average,
            fmt_opt(metrics.tokens_per_second.p95).trim_start(),
        );
    }
    println!();
}
