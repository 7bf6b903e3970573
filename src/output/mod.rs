//! Result-file writing

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::runner::BenchmarkReport;

pub struct JsonExporter;

impl JsonExporter {
    /// Write reports to `path` as pretty JSON.
    ///
    /// A single run is written as one object, several runs as an array,
    /// matching what downstream tooling expects to read back.
    pub fn export(reports: &[BenchmarkReport], path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        if let [report] = reports {
            serde_json::to_writer_pretty(file, report)?;
        } else {
            serde_json::to_writer_pretty(file, reports)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BenchmarkConfig, RunMode};
    use crate::providers::Provider;
    use crate::runner::BenchmarkRunner;
    use crate::{error::RequestError, metrics::RequestMetrics};

    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedProvider;

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn execute(&self, _timeout: Duration) -> Result<RequestMetrics, RequestError> {
            Ok(RequestMetrics {
                output_tokens: 10,
                elapsed: Duration::from_millis(50),
                tokens_per_second: 200.0,
                ttft: Some(Duration::from_millis(10)),
            })
        }
    }

    async fn sample_report() -> BenchmarkReport {
        let config = BenchmarkConfig::new(3, RunMode::Concurrent { concurrency: 1 }, "m");
        BenchmarkRunner::new(Arc::new(FixedProvider), config)
            .with_progress(false)
            .run()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_report_written_as_object() {
        let report = sample_report().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        JsonExporter::export(std::slice::from_ref(&report), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.is_object());
        assert_eq!(value["total_requests"], 3);
        assert_eq!(value["model"], "m");
    }

    #[tokio::test]
    async fn test_multiple_reports_written_as_array() {
        let reports = vec![sample_report().await, sample_report().await];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        JsonExporter::export(&reports, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 2);
    }
}
