//! Benchmark run configuration
//!
//! A [`BenchmarkConfig`] describes one run: how many requests, how they are
//! scheduled ([`RunMode`]), and the per-request parameters. Configurations
//! are validated once up front and never mutated afterwards.
//!
//! The [`RawConfig`] layer parses the JSON documents accepted on the command
//! line (a single object or an array of objects) into validated configs.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default per-request timeout for fixed-concurrency runs.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on generated tokens per request.
pub const DEFAULT_OUTPUT_TOKENS: u32 = 100;

/// Probability distribution governing launch offsets in a distributed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadMode {
    /// Offsets drawn uniformly over the whole window
    Uniform,
    /// Offsets centered at the window midpoint, std dev of a sixth of the window
    Normal,
    /// Offsets drawn with mean at a third of the window, clipped into range
    Exponential,
}

impl FromStr for SpreadMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(SpreadMode::Uniform),
            "normal" => Ok(SpreadMode::Normal),
            "exponential" => Ok(SpreadMode::Exponential),
            other => Err(ConfigError::UnknownSpreadMode(other.to_string())),
        }
    }
}

impl fmt::Display for SpreadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpreadMode::Uniform => "uniform",
            SpreadMode::Normal => "normal",
            SpreadMode::Exponential => "exponential",
        };
        f.write_str(name)
    }
}

/// How requests are scheduled across a run.
#[derive(Debug, Clone, Copy)]
pub enum RunMode {
    /// A fixed worker pool with at most `concurrency` requests in flight.
    Concurrent {
        /// Maximum simultaneous in-flight requests
        concurrency: usize,
    },
    /// Launch times drawn from `spread` over a `duration` window, with no
    /// concurrency cap. Launches stop once the window elapses.
    Distributed {
        /// Length of the launch window
        duration: Duration,
        /// Distribution the launch offsets are sampled from
        spread: SpreadMode,
    },
}

/// Immutable per-run configuration.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Total number of requests to issue
    pub num_requests: usize,
    /// Scheduling mode
    pub mode: RunMode,
    /// Per-request timeout (fixed-concurrency runs; distributed runs use the
    /// window length instead)
    pub request_timeout: Duration,
    /// Cap on generated tokens per request
    pub max_output_tokens: u32,
    /// Use (context, prompt) pairs instead of the short-prompt catalog
    pub use_long_context: bool,
    /// Model identifier sent with every request
    pub model: String,
}

impl BenchmarkConfig {
    /// Create a config with default timeout and token cap.
    pub fn new(num_requests: usize, mode: RunMode, model: impl Into<String>) -> Self {
        Self {
            num_requests,
            mode,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_output_tokens: DEFAULT_OUTPUT_TOKENS,
            use_long_context: false,
            model: model.into(),
        }
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the generated-token cap.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Select the long-context prompt catalog.
    pub fn with_long_context(mut self, use_long_context: bool) -> Self {
        self.use_long_context = use_long_context;
        self
    }

    /// The timeout each individual request runs under.
    ///
    /// Distributed runs give every request the whole window as its timeout,
    /// which is why a run may outlast its nominal duration.
    pub fn effective_timeout(&self) -> Duration {
        match self.mode {
            RunMode::Concurrent { .. } => self.request_timeout,
            RunMode::Distributed { duration, .. } => duration,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] for a zero request count, zero concurrency,
    /// or an empty window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_requests == 0 {
            return Err(ConfigError::Invalid(
                "num_requests must be greater than zero".to_string(),
            ));
        }
        match self.mode {
            RunMode::Concurrent { concurrency } => {
                if concurrency == 0 {
                    return Err(ConfigError::Invalid(
                        "concurrency must be greater than zero".to_string(),
                    ));
                }
            }
            RunMode::Distributed { duration, .. } => {
                if duration.is_zero() {
                    return Err(ConfigError::Invalid(
                        "duration must be greater than zero".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// One benchmark entry as it appears in a `--config` document.
///
/// Mode detection: `spread_mode` together with `duration` selects a
/// distributed run; otherwise `concurrency` is required.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    pub num_requests: Option<usize>,
    pub concurrency: Option<usize>,
    pub duration: Option<f64>,
    pub spread_mode: Option<String>,
    pub request_timeout: Option<f64>,
    pub output_tokens: Option<u32>,
}

impl RawConfig {
    /// Resolve into a validated [`BenchmarkConfig`].
    pub fn into_config(
        self,
        model: &str,
        use_long_context: bool,
    ) -> Result<BenchmarkConfig, ConfigError> {
        let num_requests = self
            .num_requests
            .ok_or_else(|| ConfigError::Invalid("missing `num_requests`".to_string()))?;

        let mode = match (self.spread_mode, self.duration) {
            (Some(spread), Some(duration)) => RunMode::Distributed {
                duration: positive_secs("duration", duration)?,
                spread: spread.parse()?,
            },
            (Some(_), None) => {
                return Err(ConfigError::Invalid(
                    "`spread_mode` requires `duration`".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(ConfigError::Invalid(
                    "`duration` requires `spread_mode`".to_string(),
                ))
            }
            (None, None) => RunMode::Concurrent {
                concurrency: self.concurrency.ok_or_else(|| {
                    ConfigError::Invalid(
                        "missing `concurrency` for a fixed-concurrency run".to_string(),
                    )
                })?,
            },
        };

        let mut config =
            BenchmarkConfig::new(num_requests, mode, model).with_long_context(use_long_context);
        if let Some(timeout) = self.request_timeout {
            config = config.with_request_timeout(positive_secs("request_timeout", timeout)?);
        }
        if let Some(output_tokens) = self.output_tokens {
            config = config.with_max_output_tokens(output_tokens);
        }
        config.validate()?;
        Ok(config)
    }
}

fn positive_secs(field: &str, value: f64) -> Result<Duration, ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "`{field}` must be a positive number of seconds, got {value}"
        )));
    }
    Ok(Duration::from_secs_f64(value))
}

/// Parse a `--config` document: a single JSON object or an array of objects.
pub fn parse_raw_configs(document: &str) -> Result<Vec<RawConfig>, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(document)?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ConfigError::from))
            .collect(),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}
