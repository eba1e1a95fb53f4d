//! Error types for Extractkit

use thiserror::Error;

/// Typed faults raised outside the normalized result shape
///
/// Extraction failures reported by the crawler or the LLM are folded into
/// [`NormalizedResult`](crate::NormalizedResult) by the normalizer; these
/// variants cover request validation and infrastructure faults, which
/// surface to callers as transport-level errors instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// LLM strategy without a prompt
    #[error("Missing required parameter: prompt (required for the llm strategy)")]
    MissingPrompt,

    /// Prompt below the minimum usable length
    #[error("Prompt too short: must be at least 10 characters after trimming")]
    PromptTooShort,

    /// CSS-schema strategy without a schema
    #[error("Missing required parameter: schema (required for the css_schema strategy)")]
    MissingSchema,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Crawl sidecar could not be reached or answered with a transport fault
    #[error("Crawler unavailable: {0}")]
    CrawlerUnavailable(String),

    /// LLM completion API could not be reached or answered with a transport fault
    #[error("Completion unavailable: {0}")]
    CompletionUnavailable(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
