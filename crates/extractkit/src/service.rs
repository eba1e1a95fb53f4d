//! Extraction orchestration
//!
//! Ties the pipeline together: validate the request, dispatch the crawl,
//! normalize the outcome with the recovery completion available.

use tracing::info;

use crate::config::DEFAULT_MAX_HTML_BYTES;
use crate::crawler::Crawler;
use crate::error::ExtractError;
use crate::llm::Completion;
use crate::normalizer::normalize_with_recovery;
use crate::types::{ExtractRequest, NormalizedResult};

/// Extraction service generic over its external collaborators
///
/// Generic to allow doubles in tests:
/// - Production: `ExtractService<SidecarCrawler, GeminiClient>`
/// - Testing: `ExtractService<MockCrawler, MockCompletion>`
pub struct ExtractService<C: Crawler, L: Completion> {
    crawler: C,
    completion: L,
    max_html_bytes: usize,
}

impl<C: Crawler, L: Completion> ExtractService<C, L> {
    /// Create a new service over the given collaborators
    pub fn new(crawler: C, completion: L) -> Self {
        Self {
            crawler,
            completion,
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
        }
    }

    /// Cap the raw HTML bytes appended to a recovery prompt
    pub fn with_max_html_bytes(mut self, max_html_bytes: usize) -> Self {
        self.max_html_bytes = max_html_bytes;
        self
    }

    /// Run one extraction end to end
    ///
    /// Returns `Err` only for request validation failures and
    /// infrastructure faults; every extraction-level failure comes back as
    /// a [`NormalizedResult`] with `success == false`.
    pub async fn extract(&self, request: &ExtractRequest) -> Result<NormalizedResult, ExtractError> {
        request.validate()?;

        info!(url = %request.url, strategy = %request.strategy, "extract request");

        let outcome = self.crawler.crawl(request).await?;
        let result =
            normalize_with_recovery(Some(&outcome), request, &self.completion, self.max_html_bytes)
                .await;

        info!(url = %request.url, success = result.success, "extract finished");
        Ok(result)
    }
}
