//! The external completion service: trait seam and OpenAI-compatible client.
//!
//! The orchestrator only knows the [`CompletionService`] trait — one
//! operation, `complete(system, user) -> text`. This module is intentionally
//! thin: prompt content lives in [`crate::prompts`] and the
//! primary-vs-fallback decision lives in [`crate::convert`], so the client
//! here is nothing but wire format and error mapping.
//!
//! ## No retry
//!
//! A failed call is not retried: the guaranteed-success heuristic fallback is
//! cheaper and faster than a second network round-trip, and the caller is an
//! interactive request that should not wait out a backoff schedule.

use crate::error::ServiceError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A text-completion service: one system instruction, one user turn, one answer.
///
/// Object-safe so configs can carry `Arc<dyn CompletionService>`; the boxed
/// future keeps the trait usable on stable without an async-trait macro.
pub trait CompletionService: Send + Sync {
    /// Request a completion. Returns the assistant text, or a
    /// [`ServiceError`] the caller is expected to recover from.
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, Result<String, ServiceError>>;

    /// Model identifier, for logging and [`crate::output::ConversionOutput::model`].
    fn model(&self) -> &str;
}

/// Client for an OpenAI-compatible `POST {base}/chat/completions` endpoint.
pub struct OpenAiCompletion {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    timeout_secs: u64,
}

impl OpenAiCompletion {
    /// Build a client. Fails only if the underlying HTTP client cannot be
    /// constructed (TLS backend initialisation).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: usize,
        timeout_secs: u64,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            max_tokens,
            timeout_secs,
        })
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, ServiceError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                WireMessage { role: "system", content: system },
                WireMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Completion request: model={} url={}", self.model, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    ServiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body: truncate(&body, 300),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Transport(format!("invalid response body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ServiceError::EmptyCompletion);
        }

        Ok(content)
    }
}

impl CompletionService for OpenAiCompletion {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(self.chat(system, user))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Truncate an error body so a verbose API response does not flood the logs.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_stripped() {
        let svc =
            OpenAiCompletion::new("https://api.example.com/v1/", "k", "m", 0.3, 100, 30).unwrap();
        assert_eq!(svc.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "あいうえお";
        let t = truncate(s, 4);
        assert!(t.starts_with('あ'));
        assert!(t.ends_with('…'));
    }

    #[test]
    fn response_with_missing_content_parses() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn request_serialises_expected_shape() {
        let req = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![WireMessage { role: "system", content: "s" }],
            temperature: 0.3,
            max_tokens: 2000,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 2000);
    }
}
