//! LLM completion boundary
//!
//! The normalizer's recovery path and the primary LLM-strategy extraction
//! both talk to a completion API through the [`Completion`] trait.
//! [`GeminiClient`] is the production implementation against the Google
//! Generative Language REST API; [`MockCompletion`] is the scripted double
//! used in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::error::ExtractError;
use crate::DEFAULT_USER_AGENT;

/// Completion request timeout
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Production Generative Language API base
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Trait for raw LLM text completions
///
/// Implementations return `Ok(None)` when the model produced no text; that
/// is a normal (if unhelpful) answer, not a transport fault.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Complete a prompt, returning the model's raw text output
    async fn complete(&self, prompt: &str) -> Result<Option<String>, ExtractError>;
}

/// Client for the Google Generative Language API (Gemini)
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new client for the given API key and model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(COMPLETION_TIMEOUT)
            .build()
            .map_err(ExtractError::ClientBuildError)?;

        Ok(Self {
            client,
            base_url: GEMINI_API_BASE.to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Override the API base URL (used by tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model identifier this client completes with
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateContentReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl Completion for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, ExtractError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentBody {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_bytes = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractError::CompletionUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractError::CompletionUnavailable(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let reply: GenerateContentReply = response
            .json()
            .await
            .map_err(|e| ExtractError::CompletionUnavailable(e.to_string()))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty());

        Ok(text)
    }
}

/// Scripted completion double for tests
///
/// Records how many times it was called so tests can assert the one-shot
/// nature of the recovery path.
pub struct MockCompletion {
    reply: Result<Option<String>, String>,
    calls: AtomicUsize,
}

impl MockCompletion {
    /// Always answer with the given text
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(Some(text.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with no text
    pub fn empty() -> Self {
        Self {
            reply: Ok(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completion calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completion for MockCompletion {
    async fn complete(&self, _prompt: &str) -> Result<Option<String>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ExtractError::CompletionUnavailable(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = GeminiClient::new("test-key", "gemini-2.0-flash").unwrap();
        assert_eq!(client.model(), "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockCompletion::returning("hi");
        assert_eq!(mock.calls(), 0);
        let _ = mock.complete("prompt").await;
        let _ = mock.complete("prompt").await;
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn test_reply_deserialization() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\": 1}"}]}}
            ]
        }"#;
        let reply: GenerateContentReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.candidates.len(), 1);
        assert_eq!(
            reply.candidates[0].content.parts[0].text.as_deref(),
            Some("{\"a\": 1}")
        );
    }

    #[test]
    fn test_reply_deserialization_empty() {
        let reply: GenerateContentReply = serde_json::from_str("{}").unwrap();
        assert!(reply.candidates.is_empty());
    }
}
