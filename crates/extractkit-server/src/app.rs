//! Application state and router configuration

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use extractkit::{
    ExtractError, ExtractService, ExtractorConfig, GeminiClient, SidecarCrawler,
};

/// Production service type used by the handlers
pub type AppService = ExtractService<SidecarCrawler, GeminiClient>;

/// Shared application state
///
/// `service` stays absent when the completion API key is not configured;
/// requests then fail with a configuration error instead of the process
/// refusing to start, matching the health endpoint's reporting.
#[derive(Clone)]
pub struct AppState {
    pub service: Option<Arc<AppService>>,
    pub config: ExtractorConfig,
}

impl AppState {
    /// Build state from configuration, constructing the HTTP clients
    pub fn from_config(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let service = match config.google_ai_api_key.as_deref() {
            Some(api_key) => {
                let crawler = SidecarCrawler::new(&config.crawler_url)?;
                let completion = GeminiClient::new(api_key, &config.model)?;
                Some(Arc::new(
                    ExtractService::new(crawler, completion)
                        .with_max_html_bytes(config.max_html_bytes),
                ))
            }
            None => {
                tracing::error!("GOOGLE_AI_API_KEY not set; extraction requests will fail");
                None
            }
        };

        Ok(Self { service, config })
    }
}

/// Build the axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/extract", post(crate::routes::extract_handler))
        .route("/health", get(crate::routes::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
