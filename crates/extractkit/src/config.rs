//! Environment-backed configuration

use crate::error::ExtractError;

/// Default sidecar base URL
pub const DEFAULT_CRAWLER_URL: &str = "http://127.0.0.1:8001";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default server bind address
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Default cap on raw HTML bytes in a recovery prompt
pub const DEFAULT_MAX_HTML_BYTES: usize = 200_000;

/// Runtime configuration for the extraction pipeline
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Google Generative Language API key (`GOOGLE_AI_API_KEY`)
    pub google_ai_api_key: Option<String>,
    /// Crawl sidecar base URL (`CRAWLER_URL`)
    pub crawler_url: String,
    /// Completion model identifier (`EXTRACTKIT_MODEL`)
    pub model: String,
    /// Server bind address (`EXTRACTKIT_BIND`)
    pub bind: String,
    /// Recovery prompt HTML budget in bytes (`EXTRACTKIT_MAX_HTML_BYTES`)
    pub max_html_bytes: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            google_ai_api_key: None,
            crawler_url: DEFAULT_CRAWLER_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            bind: DEFAULT_BIND.to_string(),
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
        }
    }
}

impl ExtractorConfig {
    /// Read configuration from the process environment
    ///
    /// Unset variables fall back to defaults; the API key stays optional
    /// here and is enforced by [`require_api_key`](Self::require_api_key)
    /// at the point of use.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            google_ai_api_key: env_non_empty("GOOGLE_AI_API_KEY"),
            crawler_url: env_non_empty("CRAWLER_URL").unwrap_or(defaults.crawler_url),
            model: env_non_empty("EXTRACTKIT_MODEL").unwrap_or(defaults.model),
            bind: env_non_empty("EXTRACTKIT_BIND").unwrap_or(defaults.bind),
            max_html_bytes: env_non_empty("EXTRACTKIT_MAX_HTML_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_html_bytes),
        }
    }

    /// The API key, or a configuration error if it is missing
    pub fn require_api_key(&self) -> Result<&str, ExtractError> {
        self.google_ai_api_key
            .as_deref()
            .ok_or_else(|| ExtractError::Config("GOOGLE_AI_API_KEY not set".to_string()))
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
