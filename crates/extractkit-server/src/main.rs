//! Extractkit server binary

use anyhow::Context;
use extractkit_server::{build_app, AppState};
use extractkit::ExtractorConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ExtractorConfig::from_env();
    let bind = config.bind.clone();

    tracing::info!(
        bind = %bind,
        crawler_url = %config.crawler_url,
        model = %config.model,
        "starting extractkit server"
    );

    let state = AppState::from_config(config).context("Failed to build application state")?;
    let router = build_app(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}
