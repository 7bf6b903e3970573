//! Metrics collection and aggregation
//!
//! A [`MetricsCollector`] owns the per-request outcomes while a run is in
//! flight; [`MetricsCollector::aggregate`] reduces them to the reported
//! statistics. Aggregation is a pure function of its inputs: the same
//! outcomes, attempted count, and elapsed time always produce the same
//! report.

use std::time::Duration;

use serde::Serialize;

/// Measurements from a single successfully completed request.
///
/// A request that timed out or hit a transport error produces no
/// `RequestMetrics` at all; it is only counted.
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    /// Content-bearing chunks received before the finish marker
    pub output_tokens: u64,
    /// Wall time from request start to stream completion
    pub elapsed: Duration,
    /// `output_tokens / elapsed`, 0 when elapsed is 0
    pub tokens_per_second: f64,
    /// Time from request start to the first content chunk; `None` when the
    /// stream finished without producing any content
    pub ttft: Option<Duration>,
}

/// Average and percentile figures for one measured series.
///
/// Percentiles are linearly interpolated over the sorted series and absent
/// when the series is empty. Latency and TTFT use the standard convention:
/// `p95` is the value below which 95% of observations fall. Tokens-per-second
/// is inverted: since a larger value is better, its `p95`/`p99` are computed
/// at the 5th/1st points of the raw series, so a higher percentile label
/// denotes a worse outcome for every series. Consumers comparing these
/// figures against other tools should account for the inversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    /// Arithmetic mean, 0.0 when the series is empty
    pub average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99: Option<f64>,
}

impl SeriesStats {
    /// Compute stats for a series; `reverse` selects the inverted convention
    /// used for better-is-larger series.
    fn from_series(values: &[f64], reverse: bool) -> Self {
        let average = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let at = |p: f64| percentile(&sorted, if reverse { 100.0 - p } else { p });
        Self {
            average,
            p50: at(50.0),
            p95: at(95.0),
            p99: at(99.0),
        }
    }
}

/// Linear-interpolation percentile of an ascending-sorted series.
///
/// `None` for an empty series, never an error.
fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let weight = rank - lo as f64;
    Some(sorted[lo] * (1.0 - weight) + sorted[hi] * weight)
}

/// Aggregate statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedMetrics {
    /// Requests actually attempted (may be below the requested count in
    /// distributed mode when the window closes early)
    pub attempted_requests: usize,
    /// Requests that produced an outcome
    pub successful_requests: usize,
    /// Requests that timed out or failed in transport
    pub failed_requests: usize,
    /// Run wall time in seconds
    pub total_time: f64,
    /// `successful_requests / total_time`, 0 when total_time is 0
    pub requests_per_second: f64,
    /// Sum of output tokens over all successful requests
    pub total_output_tokens: u64,
    /// End-to-end latency in seconds
    pub latency: SeriesStats,
    /// Per-request generation throughput (inverted percentiles, see
    /// [`SeriesStats`])
    pub tokens_per_second: SeriesStats,
    /// Time to first token in seconds
    pub time_to_first_token: SeriesStats,
}

/// Collector owning the outcome collection while a run is in flight.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: Vec<RequestMetrics>,
}

impl MetricsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome.
    pub fn add(&mut self, metrics: RequestMetrics) {
        self.metrics.push(metrics);
    }

    /// Number of collected outcomes.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no outcomes have been collected.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Iterate over the collected outcomes.
    pub fn iter(&self) -> impl Iterator<Item = &RequestMetrics> {
        self.metrics.iter()
    }

    /// Reduce the collection to summary statistics.
    pub fn aggregate(&self, attempted: usize, elapsed: Duration) -> AggregatedMetrics {
        let successful = self.metrics.len();
        let total_time = elapsed.as_secs_f64();
        let requests_per_second = if total_time > 0.0 {
            successful as f64 / total_time
        } else {
            0.0
        };

        let total_output_tokens: u64 = self.metrics.iter().map(|m| m.output_tokens).sum();

        let latencies: Vec<f64> = self.metrics.iter().map(|m| m.elapsed.as_secs_f64()).collect();
        let throughputs: Vec<f64> = self.metrics.iter().map(|m| m.tokens_per_second).collect();
        let ttfts: Vec<f64> = self
            .metrics
            .iter()
            .filter_map(|m| m.ttft.map(|d| d.as_secs_f64()))
            .collect();

        AggregatedMetrics {
            attempted_requests: attempted,
            successful_requests: successful,
            failed_requests: attempted.saturating_sub(successful),
            total_time,
            requests_per_second,
            total_output_tokens,
            latency: SeriesStats::from_series(&latencies, false),
            tokens_per_second: SeriesStats::from_series(&throughputs, true),
            time_to_first_token: SeriesStats::from_series(&ttfts, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with_latency(secs: f64) -> RequestMetrics {
        RequestMetrics {
            output_tokens: 50,
            elapsed: Duration::from_secs_f64(secs),
            tokens_per_second: 50.0 / secs,
            ttft: Some(Duration::from_secs_f64(secs / 2.0)),
        }
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&series, 50.0), Some(3.0));
        assert_eq!(percentile(&series, 0.0), Some(1.0));
        assert_eq!(percentile(&series, 100.0), Some(5.0));

        // Interpolated toward the maximum, not snapped to an element.
        let p95 = percentile(&series, 95.0).unwrap();
        assert!((p95 - 4.8).abs() < 1e-9);
        let p99 = percentile(&series, 99.0).unwrap();
        assert!((p99 - 4.96).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_empty_series() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_latency_stats_use_standard_convention() {
        let stats = SeriesStats::from_series(&[1.0, 2.0, 3.0, 4.0, 5.0], false);
        assert!((stats.average - 3.0).abs() < 1e-9);
        assert_eq!(stats.p50, Some(3.0));
        assert!((stats.p95.unwrap() - 4.8).abs() < 1e-9);
        assert!((stats.p99.unwrap() - 4.96).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_stats_are_inverted() {
        // Larger tokens-per-second is better, so the reported "p95" is the
        // 5th percentile of the raw series: near the minimum, not the
        // maximum.
        let stats = SeriesStats::from_series(&[10.0, 20.0, 30.0, 40.0, 50.0], true);
        assert_eq!(stats.p50, Some(30.0));
        assert!((stats.p95.unwrap() - 12.0).abs() < 1e-9);
        assert!((stats.p99.unwrap() - 10.4).abs() < 1e-9);
        assert!(stats.p95.unwrap() < stats.p50.unwrap());
    }

    #[test]
    fn test_empty_series_stats() {
        let stats = SeriesStats::from_series(&[], false);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.p50, None);
        assert_eq!(stats.p95, None);
        assert_eq!(stats.p99, None);
    }

    #[test]
    fn test_aggregate_counts_and_rates() {
        let mut collector = MetricsCollector::new();
        for _ in 0..8 {
            collector.add(metrics_with_latency(0.5));
        }

        let agg = collector.aggregate(10, Duration::from_secs(4));
        assert_eq!(agg.attempted_requests, 10);
        assert_eq!(agg.successful_requests, 8);
        assert_eq!(agg.failed_requests, 2);
        assert_eq!(agg.total_output_tokens, 400);
        assert!((agg.requests_per_second - 2.0).abs() < 1e-9);
        assert!((agg.latency.average - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_zero_elapsed_yields_zero_rate() {
        let mut collector = MetricsCollector::new();
        collector.add(metrics_with_latency(0.1));

        let agg = collector.aggregate(1, Duration::ZERO);
        assert_eq!(agg.requests_per_second, 0.0);
    }

    #[test]
    fn test_aggregate_empty_collection() {
        let collector = MetricsCollector::new();
        let agg = collector.aggregate(5, Duration::from_secs(1));

        assert_eq!(agg.successful_requests, 0);
        assert_eq!(agg.failed_requests, 5);
        assert_eq!(agg.requests_per_second, 0.0);
        assert_eq!(agg.latency.p95, None);
        assert_eq!(agg.tokens_per_second.p99, None);
        assert_eq!(agg.time_to_first_token.average, 0.0);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let mut collector = MetricsCollector::new();
        for i in 1..=20 {
            collector.add(metrics_with_latency(i as f64 / 10.0));
        }

        let first = collector.aggregate(25, Duration::from_secs(3));
        let second = collector.aggregate(25, Duration::from_secs(3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_ttft_series_skips_missing_values() {
        let mut collector = MetricsCollector::new();
        collector.add(RequestMetrics {
            output_tokens: 0,
            elapsed: Duration::from_secs(1),
            tokens_per_second: 0.0,
            ttft: None,
        });
        collector.add(RequestMetrics {
            output_tokens: 10,
            elapsed: Duration::from_secs(1),
            tokens_per_second: 10.0,
            ttft: Some(Duration::from_millis(200)),
        });

        let agg = collector.aggregate(2, Duration::from_secs(2));
        // Only the request that produced a token contributes to TTFT.
        assert!((agg.time_to_first_token.average - 0.2).abs() < 1e-9);
        assert_eq!(agg.time_to_first_token.p50, Some(0.2));
    }
}
