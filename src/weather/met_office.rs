//! Met Office DataHub site-specific client
//!
//! Runs either directly against DataHub with an API key header, or through
//! the same-origin proxy served by [`crate::api`], which injects the key
//! server-side.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::{Endpoint, WeatherSource};
use crate::{GustError, Result};

pub const DATAHUB_URL: &str = "https://data.hub.api.metoffice.gov.uk/sitespecific/v0/point";
const USER_AGENT: &str = concat!("gustwatch/", env!("CARGO_PKG_VERSION"));

const UNAUTHORISED: &str = "Unauthorised: check your Met Office API key.";
const RATE_LIMITED: &str = "Rate limit reached (360 calls/day on free tier). Try later.";
const MISSING_KEY: &str = "Missing API key. Add METOFFICE_API_KEY to your environment.";

/// How requests reach the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET {base}/{endpoint}?...` with an `apikey` header
    Direct { base_url: String, api_key: Option<String> },
    /// `GET {proxy}?endpoint=...`; the proxy owns the key
    Proxy { proxy_url: String },
}

/// Met Office point forecast client
#[derive(Debug, Clone)]
pub struct MetOfficeClient {
    client: Client,
    route: Route,
}

impl MetOfficeClient {
    pub fn new(route: Route, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GustError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, route })
    }

    /// Direct client against `base_url`
    pub fn direct(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Self::new(
            Route::Direct {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.filter(|key| !key.trim().is_empty()),
            },
            timeout,
        )
    }

    /// Client routed through the key-hiding proxy
    pub fn via_proxy(proxy_url: &str, timeout: Duration) -> Result<Self> {
        Self::new(
            Route::Proxy {
                proxy_url: proxy_url.to_string(),
            },
            timeout,
        )
    }

    fn build_request(
        &self,
        endpoint: Endpoint,
        latitude: f64,
        longitude: f64,
    ) -> Result<reqwest::RequestBuilder> {
        let coordinates = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("includeLocationName", "true".to_string()),
        ];

        let request = match &self.route {
            Route::Direct { base_url, api_key } => {
                let api_key = api_key
                    .as_deref()
                    .ok_or_else(|| GustError::missing_configuration(MISSING_KEY))?;
                self.client
                    .get(format!("{base_url}/{endpoint}"))
                    .query(&coordinates)
                    .header("apikey", api_key)
            }
            Route::Proxy { proxy_url } => self
                .client
                .get(proxy_url)
                .query(&[("endpoint", endpoint.as_str())])
                .query(&coordinates),
        };

        Ok(request.header("accept", "application/json"))
    }
}

/// Map a provider status to the error taxonomy
fn status_error(status: StatusCode, endpoint: Endpoint) -> GustError {
    match status {
        StatusCode::UNAUTHORIZED => GustError::auth(UNAUTHORISED),
        StatusCode::TOO_MANY_REQUESTS => GustError::rate_limit(RATE_LIMITED),
        _ => GustError::fetch(format!("Failed to fetch {} data.", endpoint.data_label())),
    }
}

#[async_trait]
impl WeatherSource for MetOfficeClient {
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    async fn fetch(&self, endpoint: Endpoint, latitude: f64, longitude: f64) -> Result<Value> {
        let start_time = Instant::now();
        let request = self.build_request(endpoint, latitude, longitude)?;

        let response = request.send().await.map_err(|e| {
            warn!("Met Office request failed: {}", e);
            GustError::fetch(format!("Failed to fetch {} data.", endpoint.data_label()))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Met Office returned status {}", status);
            return Err(status_error(status, endpoint));
        }

        let body: Value = response.json().await.map_err(|e| {
            debug!("Met Office response parse error: {}", e);
            GustError::fetch(format!("Failed to fetch {} data.", endpoint.data_label()))
        })?;

        info!(
            "Fetched {} data in {:.3}s",
            endpoint,
            start_time.elapsed().as_secs_f64()
        );
        Ok(body)
    }

    fn is_configured(&self) -> bool {
        !matches!(self.route, Route::Direct { api_key: None, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn envelope() -> Value {
        serde_json::json!({
            "features": [{ "properties": { "timeSeries": [{ "time": "2024-01-15T12:00Z" }] } }]
        })
    }

    #[tokio::test]
    async fn test_direct_fetch_sends_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/point/three-hourly"))
            .and(query_param("latitude", "50.5"))
            .and(query_param("longitude", "-4.25"))
            .and(query_param("includeLocationName", "true"))
            .and(header("apikey", "secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope()))
            .mount(&mock_server)
            .await;

        let client = MetOfficeClient::direct(
            &format!("{}/point", mock_server.uri()),
            Some("secret-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let body = client.fetch(Endpoint::ThreeHourly, 50.5, -4.25).await.unwrap();
        assert_eq!(body, envelope());
    }

    #[tokio::test]
    async fn test_proxy_fetch_passes_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/metoffice"))
            .and(query_param("endpoint", "hourly"))
            .and(query_param("latitude", "50.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope()))
            .mount(&mock_server)
            .await;

        let client = MetOfficeClient::via_proxy(
            &format!("{}/api/metoffice", mock_server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(client.fetch(Endpoint::Hourly, 50.5, -4.25).await.is_ok());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/point/hourly"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/point/three-hourly"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = MetOfficeClient::direct(
            &format!("{}/point", mock_server.uri()),
            Some("key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let auth = client.fetch(Endpoint::Hourly, 1.0, 1.0).await.unwrap_err();
        assert!(matches!(auth, GustError::Auth { .. }));

        let limited = client.fetch(Endpoint::ThreeHourly, 1.0, 1.0).await.unwrap_err();
        assert!(matches!(limited, GustError::RateLimit { .. }));
        assert_eq!(limited.user_message(), RATE_LIMITED);
    }

    #[tokio::test]
    async fn test_other_status_is_fetch_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = MetOfficeClient::direct(
            &format!("{}/point", mock_server.uri()),
            Some("key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.fetch(Endpoint::Hourly, 1.0, 1.0).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to fetch observation data.");
    }

    #[tokio::test]
    async fn test_direct_without_key_is_missing_configuration() {
        let client =
            MetOfficeClient::direct(DATAHUB_URL, Some("  ".to_string()), Duration::from_secs(5))
                .unwrap();
        assert!(!client.is_configured());
        let err = client.fetch(Endpoint::Hourly, 1.0, 1.0).await.unwrap_err();
        assert!(matches!(err, GustError::MissingConfiguration { .. }));

        let proxied =
            MetOfficeClient::via_proxy("http://localhost:3000/api/metoffice", Duration::from_secs(5))
                .unwrap();
        assert!(proxied.is_configured());
    }
}
