//! Postcode geocoding via postcodes.io. Free, no API key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::GeocodeSource;
use crate::models::GeocodeResult;
use crate::{GustError, Result};

pub const POSTCODES_URL: &str = "https://api.postcodes.io/postcodes";
const USER_AGENT: &str = concat!("gustwatch/", env!("CARGO_PKG_VERSION"));

const LOOKUP_FAILED: &str = "Could not look up postcode. Check the value and try again.";
const INVALID_POSTCODE: &str = "Invalid postcode. Please provide a UK postcode.";

#[derive(Debug, Deserialize)]
struct PostcodeResponse {
    status: u16,
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    country: Option<String>,
    region: Option<String>,
    admin_district: Option<String>,
    postcode: Option<String>,
}

/// postcodes.io client
#[derive(Debug, Clone)]
pub struct PostcodesClient {
    client: Client,
    base_url: String,
}

impl PostcodesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GustError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeocodeSource for PostcodesClient {
    #[instrument(skip(self))]
    async fn lookup(&self, postcode: &str) -> Result<GeocodeResult> {
        let trimmed = postcode.trim();
        let url = format!("{}/{}", self.base_url, urlencoding::encode(trimmed));

        let response = self.client.get(&url).send().await.map_err(|e| {
            debug!("Postcode lookup request failed: {}", e);
            GustError::geocode(LOOKUP_FAILED)
        })?;

        if !response.status().is_success() {
            debug!("Postcode lookup returned status {}", response.status());
            return Err(GustError::geocode(LOOKUP_FAILED));
        }

        let body: PostcodeResponse = response.json().await.map_err(|e| {
            debug!("Postcode lookup parse error: {}", e);
            GustError::geocode(INVALID_POSTCODE)
        })?;

        if body.status != 200 {
            return Err(GustError::geocode(INVALID_POSTCODE));
        }
        let result = body.result.ok_or_else(|| GustError::geocode(INVALID_POSTCODE))?;
        let (Some(latitude), Some(longitude)) = (result.latitude, result.longitude) else {
            return Err(GustError::geocode(INVALID_POSTCODE));
        };

        let label = GeocodeResult::label_from_parts(&[
            result.postcode.as_deref(),
            result.admin_district.as_deref(),
            result.region.as_deref(),
            result.country.as_deref(),
        ]);

        info!("Geocoded {} to {:.4}, {:.4}", trimmed, latitude, longitude);
        Ok(GeocodeResult::new(latitude, longitude, label))
    }
}
