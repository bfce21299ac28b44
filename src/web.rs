use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::GustWatchConfig;
use crate::api::{self, AppState};

/// Full application router with the API nested under `/api`
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &GustWatchConfig) -> Result<()> {
    let state = AppState::from_config(config).context("Failed to set up API state")?;
    if config.weather.api_key.is_none() {
        tracing::warn!("No Met Office API key configured; the proxy will answer 500");
    }

    // A search is one geocode plus two concurrent fetches
    let request_timeout = config.geocoding.timeout() + config.weather.timeout();
    let app = app(state, request_timeout);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .await
        .context("Web server terminated")?;
    Ok(())
}
