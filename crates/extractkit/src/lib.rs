//! Extractkit - structured web data extraction with LLM and CSS-schema strategies
//!
//! This crate provides a reusable library API for turning a URL plus an
//! extraction directive (a natural-language prompt or a CSS-selector schema)
//! into normalized structured JSON.
//!
//! ## Pipeline
//!
//! The actual page fetch and extraction are delegated to external
//! collaborators behind two trait boundaries:
//! - [`Crawler`] - fetches the page and runs the directive
//!   ([`SidecarCrawler`] talks to a browser-driving crawl sidecar over HTTP)
//! - [`Completion`] - raw LLM text completion ([`GeminiClient`] talks to the
//!   Google Generative Language API)
//!
//! The engineering core is the [`normalizer`] module: an ordered decision
//! table that coerces whatever the crawler returned (missing, fenced JSON
//! text, mis-shaped values, embedded error markers) into a
//! [`NormalizedResult`], with a one-shot best-effort recovery completion
//! before declaring failure.

pub mod config;
pub mod crawler;
mod error;
mod fence;
pub mod llm;
pub mod normalizer;
mod service;
mod types;

pub use config::ExtractorConfig;
pub use crawler::{Crawler, SidecarCrawler};
pub use error::ExtractError;
pub use fence::strip_code_fence;
pub use llm::{Completion, GeminiClient};
pub use normalizer::{normalize, normalize_with_recovery, Normalization};
pub use service::ExtractService;
pub use types::{ExtractRequest, ExtractionOutcome, ExtractionStrategy, NormalizedResult};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Extractkit/1.0";
