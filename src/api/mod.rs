//! HTTP API: the key-hiding Met Office proxy and the JSON dashboard
//!
//! `GET /metoffice` forwards a point request upstream with the server-held
//! key. `GET /properties` and `GET /wind?property=` expose the monitor.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::GustWatchConfig;
use crate::models::PropertyConfig;
use crate::monitor::{Monitor, SearchOutcome};
use crate::weather::Endpoint;
use crate::{GustError, Result};

const CACHE_CONTROL: &str = "max-age=300";

/// Upstream the proxy forwards to
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Upstream {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GustError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<Upstream>,
    pub monitor: Arc<Monitor>,
}

impl AppState {
    pub fn from_config(config: &GustWatchConfig) -> Result<Self> {
        let upstream = Upstream::new(
            &config.weather.base_url,
            config.weather.api_key.clone(),
            config.weather.timeout(),
        )?;
        Ok(Self {
            upstream: Arc::new(upstream),
            monitor: Arc::new(Monitor::from_config(config)?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metoffice", get(proxy_metoffice))
        .route("/properties", get(get_properties))
        .route("/wind", get(get_wind))
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    endpoint: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    #[serde(rename = "includeLocationName")]
    include_location_name: Option<String>,
}

#[instrument(skip(state))]
async fn proxy_metoffice(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Response {
    let upstream = &state.upstream;
    let Some(api_key) = upstream.api_key.as_deref() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured");
    };

    let (Some(endpoint), Some(latitude), Some(longitude)) =
        (params.endpoint, params.latitude, params.longitude)
    else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required parameters");
    };

    let Some(endpoint) = Endpoint::parse(&endpoint) else {
        return error_response(StatusCode::BAD_REQUEST, "Unsupported endpoint");
    };

    let include_location_name = params
        .include_location_name
        .unwrap_or_else(|| "true".to_string());

    let response = upstream
        .client
        .get(format!("{}/{}", upstream.base_url, endpoint))
        .query(&[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("includeLocationName", include_location_name.as_str()),
        ])
        .header("apikey", api_key)
        .header("accept", "application/json")
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!("Proxy request to Met Office failed: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch from Met Office",
            );
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!("Met Office returned {} for {}", status, endpoint);
        let status =
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return error_response(
            status,
            format!("Met Office API returned {}", status.as_u16()),
        );
    }

    match response.bytes().await {
        Ok(body) => {
            info!("Proxied {} ({} bytes)", endpoint, body.len());
            (
                [
                    (header::CONTENT_TYPE, "application/json"),
                    (header::CACHE_CONTROL, CACHE_CONTROL),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            warn!("Failed to read Met Office response: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch from Met Office",
            )
        }
    }
}

async fn get_properties(State(state): State<AppState>) -> Json<Vec<PropertyConfig>> {
    Json(state.monitor.properties().to_vec())
}

#[derive(Debug, Deserialize)]
pub struct WindParams {
    property: Option<String>,
}

#[instrument(skip(state))]
async fn get_wind(
    State(state): State<AppState>,
    Query(params): Query<WindParams>,
) -> std::result::Result<Json<SearchOutcome>, Response> {
    let query = params.property.unwrap_or_default();
    // Each request owns its result; the monitor's page state stays untouched
    let result = state.monitor.evaluate(&query, Utc::now()).await;
    result.map(Json).map_err(|err| {
        let status = match err {
            GustError::Validation { .. } | GustError::Geocode { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        error_response(status, err.user_message())
    })
}
