//! OpenAI-compatible streaming completion client
//!
//! Works against any endpoint that speaks the `/chat/completions` wire
//! format with SSE streaming (vLLM, OpenAI, and most self-hosted gateways).
//! The client only interprets two facts about each chunk: whether it carries
//! content and whether it signals completion.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::Provider;
use crate::config::BenchmarkConfig;
use crate::error::RequestError;
use crate::metrics::RequestMetrics;
use crate::prompts::PromptCatalog;

/// Streaming client for an OpenAI-compatible endpoint.
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    use_long_context: bool,
    catalog: Arc<PromptCatalog>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIProvider {
    /// Create a client for `base_url` using the run parameters in `config`.
    pub fn new(base_url: &str, api_key: &str, config: &BenchmarkConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
            use_long_context: config.use_long_context,
            catalog: Arc::new(PromptCatalog::builtin()),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Extract the payload of a `data:` SSE line; `None` for other lines and
    /// for the `[DONE]` terminator.
    fn parse_sse_line(line: &str) -> Option<&str> {
        let data = line
            .strip_prefix("data: ")
            .or_else(|| line.strip_prefix("data:"))?;
        if data.trim() == "[DONE]" {
            None
        } else {
            Some(data)
        }
    }

    /// Send the request and consume its stream.
    ///
    /// Returns the number of content-bearing chunks and the instant the
    /// first one arrived. Consumption stops at the first finish marker.
    async fn stream_completion(
        &self,
        content: &str,
    ) -> Result<(u64, Option<Instant>), RequestError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content,
            }],
            max_tokens: self.max_output_tokens,
            stream: true,
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Transport(format!(
                "server returned {status}: {body}"
            )));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut tokens = 0u64;
        let mut first_token_at = None;

        'stream: while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(newline) = buffer.find('\n') {
                let line = buffer[..newline].trim().to_string();
                buffer.drain(..=newline);
                if line.is_empty() {
                    continue;
                }
                let Some(data) = Self::parse_sse_line(&line) else {
                    continue;
                };
                let parsed: StreamChunk = match serde_json::from_str(data) {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        tracing::debug!(error = %err, "skipping unparseable stream chunk");
                        continue;
                    }
                };

                let mut finished = false;
                for choice in &parsed.choices {
                    if choice
                        .delta
                        .content
                        .as_deref()
                        .is_some_and(|c| !c.is_empty())
                    {
                        if first_token_at.is_none() {
                            first_token_at = Some(Instant::now());
                        }
                        tokens += 1;
                    }
                    if choice.finish_reason.is_some() {
                        finished = true;
                    }
                }
                if finished {
                    break 'stream;
                }
            }
        }

        Ok((tokens, first_token_at))
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn execute(&self, timeout: Duration) -> Result<RequestMetrics, RequestError> {
        let content = self.catalog.content(self.use_long_context);
        let start = Instant::now();

        // The whole send-and-consume step runs under the timeout; on expiry
        // the in-flight stream is dropped, not salvaged.
        let (tokens, first_token_at) =
            tokio::time::timeout(timeout, self.stream_completion(&content))
                .await
                .map_err(|_| RequestError::Timeout(timeout))??;

        let elapsed = start.elapsed();
        let secs = elapsed.as_secs_f64();
        let tokens_per_second = if secs > 0.0 { tokens as f64 / secs } else { 0.0 };

        Ok(RequestMetrics {
            output_tokens: tokens,
            elapsed,
            tokens_per_second,
            ttft: first_token_at.map(|at| at.duration_since(start)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;

    fn test_provider() -> OpenAIProvider {
        let config = BenchmarkConfig::new(1, RunMode::Concurrent { concurrency: 1 }, "test-model")
            .with_max_output_tokens(64);
        OpenAIProvider::new("http://localhost:8000/v1/", "test-key", &config)
    }

    #[test]
    fn test_chat_url_strips_trailing_slash() {
        let provider = test_provider();
        assert_eq!(
            provider.chat_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_sse_line() {
        assert_eq!(
            OpenAIProvider::parse_sse_line(r#"data: {"choices":[]}"#),
            Some(r#"{"choices":[]}"#)
        );
        assert_eq!(OpenAIProvider::parse_sse_line("data: [DONE]"), None);
        assert_eq!(OpenAIProvider::parse_sse_line(": keep-alive"), None);
        assert_eq!(OpenAIProvider::parse_sse_line("event: message"), None);
    }

    #[test]
    fn test_stream_chunk_with_content() {
        let chunk: StreamChunk = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Hi"},"finish_reason":null}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hi"));
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn test_stream_chunk_with_finish_marker() {
        let chunk: StreamChunk = serde_json::from_str(
            r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert!(chunk.choices[0].delta.content.is_none());
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: "test-model",
            messages: [Message {
                role: "user",
                content: "Hello",
            }],
            max_tokens: 64,
            stream: true,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""model":"test-model""#));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""max_tokens":64"#));
        assert!(json.contains(r#""stream":true"#));
    }
}
