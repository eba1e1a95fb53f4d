//! Core types for Extractkit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use url::Url;

use crate::error::ExtractError;

/// Minimum trimmed prompt length for the LLM strategy
pub const MIN_PROMPT_LEN: usize = 10;

/// Which method is used to pull structured data from a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Natural-language prompt handed to an LLM
    #[default]
    Llm,
    /// CSS-selector schema applied to the rendered DOM
    CssSchema,
}

impl FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "llm" => Ok(ExtractionStrategy::Llm),
            "css_schema" | "css" => Ok(ExtractionStrategy::CssSchema),
            _ => Err("Invalid strategy: must be llm or css_schema".to_string()),
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::Llm => write!(f, "llm"),
            ExtractionStrategy::CssSchema => write!(f, "css_schema"),
        }
    }
}

/// Request to extract structured data from a URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractRequest {
    /// The URL to extract from (required, must be http:// or https://)
    pub url: String,

    /// Extraction strategy (default: llm)
    #[serde(default)]
    pub strategy: ExtractionStrategy,

    /// Natural-language prompt (required for the llm strategy, >= 10 chars trimmed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// CSS-selector schema (required for the css_schema strategy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl ExtractRequest {
    /// Create a new LLM-strategy request
    pub fn llm(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            strategy: ExtractionStrategy::Llm,
            prompt: Some(prompt.into()),
            schema: None,
        }
    }

    /// Create a new CSS-schema request
    pub fn css_schema(url: impl Into<String>, schema: Value) -> Self {
        Self {
            url: url.into(),
            strategy: ExtractionStrategy::CssSchema,
            prompt: None,
            schema: Some(schema),
        }
    }

    /// Validate the strategy/directive invariants
    ///
    /// - llm: prompt present with trimmed length >= [`MIN_PROMPT_LEN`]
    /// - css_schema: schema present
    /// - url: non-empty, http:// or https://
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.url.is_empty() {
            return Err(ExtractError::MissingUrl);
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ExtractError::InvalidUrlScheme);
        }
        Url::parse(&self.url).map_err(|_| ExtractError::InvalidUrlScheme)?;
        match self.strategy {
            ExtractionStrategy::Llm => match self.prompt.as_deref() {
                None => Err(ExtractError::MissingPrompt),
                Some(p) if p.trim().len() < MIN_PROMPT_LEN => Err(ExtractError::PromptTooShort),
                Some(_) => Ok(()),
            },
            ExtractionStrategy::CssSchema => {
                if self.schema.is_none() {
                    Err(ExtractError::MissingSchema)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Raw extraction outcome as reported by the external crawler
///
/// Produced once per request, consumed exactly once by the normalizer.
/// The payload shape is unknown until inspected: it may be absent, a JSON
/// string (possibly fenced), an object, or a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionOutcome {
    /// Whether the crawl itself reported success
    pub success: bool,

    /// Error text reported by the crawler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Extracted content of unknown shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Raw page HTML, when the crawler captured it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
}

impl ExtractionOutcome {
    /// Successful crawl with the given payload
    pub fn ok(payload: Value) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            ..Default::default()
        }
    }

    /// Successful crawl with no extracted content
    pub fn empty() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// Failed crawl with the given error text
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Attach the raw page HTML
    pub fn with_raw_html(mut self, html: impl Into<String>) -> Self {
        self.raw_html = Some(html.into());
        self
    }
}

/// The sole externally visible output of the pipeline
///
/// Invariants: `success == true` implies `error` is absent;
/// `success == false` implies `data` is absent. `note` carries explanatory
/// text for soft successes (selectors matching nothing) without breaking
/// the error invariant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedResult {
    /// Whether extraction produced usable data
    pub success: bool,

    /// Validated structured payload (object or list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Descriptive failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Explanatory note attached to soft successes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NormalizedResult {
    /// Successful result with validated data
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Default::default()
        }
    }

    /// Soft success with empty data and an explanatory note
    pub fn empty(note: impl Into<String>) -> Self {
        Self {
            success: true,
            note: Some(note.into()),
            ..Default::default()
        }
    }

    /// Failure with a descriptive reason
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
