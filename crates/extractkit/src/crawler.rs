//! Crawler boundary
//!
//! Page fetching, rendering, and directive execution live in an external
//! browser-driving crawl sidecar. The library only sees the sidecar's
//! result object, which [`SidecarCrawler`] maps onto
//! [`ExtractionOutcome`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::ExtractError;
use crate::types::{ExtractRequest, ExtractionOutcome, ExtractionStrategy};
use crate::DEFAULT_USER_AGENT;

/// Crawl request timeout (page rendering can be slow)
const CRAWL_TIMEOUT: Duration = Duration::from_secs(90);

/// Trait for the external crawl collaborator
///
/// `Err` means an infrastructure fault (sidecar unreachable, transport
/// error) and surfaces to the caller as such; a crawl that merely failed
/// is `Ok` with `success == false` and is handled by the normalizer.
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Fetch the page and run the request's extraction directive
    async fn crawl(&self, request: &ExtractRequest) -> Result<ExtractionOutcome, ExtractError>;
}

/// HTTP client for a crawl4ai-style sidecar service
pub struct SidecarCrawler {
    client: reqwest::Client,
    base_url: String,
}

/// Body posted to the sidecar's crawl endpoint
#[derive(Serialize)]
struct CrawlBody<'a> {
    url: &'a str,
    strategy: ExtractionStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a Value>,
}

/// Result object returned by the sidecar
#[derive(Deserialize)]
struct CrawlReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    extracted_content: Option<Value>,
    #[serde(default)]
    html: Option<String>,
}

impl SidecarCrawler {
    /// Create a new crawler client for the given sidecar base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(CRAWL_TIMEOUT)
            .build()
            .map_err(ExtractError::ClientBuildError)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the sidecar
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Crawler for SidecarCrawler {
    async fn crawl(&self, request: &ExtractRequest) -> Result<ExtractionOutcome, ExtractError> {
        let body = CrawlBody {
            url: &request.url,
            strategy: request.strategy,
            prompt: request.prompt.as_deref(),
            schema: request.schema.as_ref(),
        };

        debug!(url = %request.url, strategy = %request.strategy, "dispatching crawl");

        let response = self
            .client
            .post(format!("{}/crawl", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractError::CrawlerUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractError::CrawlerUnavailable(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let reply: CrawlReply = response
            .json()
            .await
            .map_err(|e| ExtractError::CrawlerUnavailable(e.to_string()))?;

        Ok(ExtractionOutcome {
            success: reply.success,
            error: reply.error,
            payload: reply.extracted_content,
            raw_html: reply.html,
        })
    }
}
