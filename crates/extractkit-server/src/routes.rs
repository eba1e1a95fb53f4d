//! HTTP handlers
//!
//! The extraction endpoint is a thin transport wrapper: extraction-level
//! failures always come back as a 200 with a normalized body; only request
//! validation (400) and infrastructure faults (500) use transport status
//! codes.

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use extractkit::{ExtractError, ExtractRequest, NormalizedResult};

use crate::app::AppState;

/// Error body for non-2xx responses
#[derive(Serialize)]
pub struct ErrorResponse {
    detail: String,
}

impl ErrorResponse {
    fn new(detail: impl Into<String>) -> Json<Self> {
        Json(Self {
            detail: detail.into(),
        })
    }
}

/// Map a typed fault onto a transport status
fn status_for(error: &ExtractError) -> StatusCode {
    match error {
        ExtractError::MissingUrl
        | ExtractError::InvalidUrlScheme
        | ExtractError::MissingPrompt
        | ExtractError::PromptTooShort
        | ExtractError::MissingSchema => StatusCode::BAD_REQUEST,
        ExtractError::ClientBuildError(_)
        | ExtractError::CrawlerUnavailable(_)
        | ExtractError::CompletionUnavailable(_)
        | ExtractError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Extraction endpoint
pub async fn extract_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<NormalizedResult>, (StatusCode, Json<ErrorResponse>)> {
    let Some(service) = state.service.as_ref() else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Server configuration error: Google AI API key not set"),
        ));
    };

    match service.extract(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(url = %request.url, error = %e, "extraction request failed");
            }
            Err((status, ErrorResponse::new(e.to_string())))
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    completion_configured: bool,
    crawler_url: String,
}

/// Health check endpoint
///
/// Always 200 when the process is up; reports whether the completion API
/// key is configured so deploys can catch misconfiguration early.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            completion_configured: state.service.is_some(),
            crawler_url: state.config.crawler_url.clone(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ExtractError::PromptTooShort),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ExtractError::MissingSchema),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ExtractError::CrawlerUnavailable("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ExtractError::Config("missing".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
