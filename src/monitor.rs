//! Search orchestration and display state
//!
//! A search resolves the property, geocodes its postcode, then fetches the
//! three-hourly forecast and hourly observations concurrently. Both must
//! succeed before anything is rendered; any failure resets the dashboard.
//! The [`Monitor`] owns the display state that the page (or CLI) shows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::config::{ForecastHorizon, GustWatchConfig, MonitorConfig};
use crate::models::{GeocodeResult, PropertyConfig};
use crate::summary::{Dashboard, StatusMessage};
use crate::weather::met_office::MetOfficeClient;
use crate::weather::postcodes::PostcodesClient;
use crate::weather::{
    Endpoint, GeocodeSource, WeatherSource, extract_location_name, extract_time_series,
};
use crate::wind::forecast_window;
use crate::{GustError, Result};

pub const INITIAL_STATUS: &str = "Select a property to begin.";
pub const INITIAL_LOCATION_INFO: &str = "Select a property to see monitoring location";
pub const SEARCHING_STATUS: &str = "Looking up postcode and fetching gust data…";
const EMPTY_QUERY: &str = "Please select a property.";
const MISSING_KEY: &str = "Missing API key. Add METOFFICE_API_KEY to your environment.";

/// What the page currently shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub status: StatusMessage,
    pub location_info: String,
    pub dashboard: Dashboard,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status: StatusMessage::info(INITIAL_STATUS),
            location_info: INITIAL_LOCATION_INFO.to_string(),
            dashboard: Dashboard::reset(),
        }
    }
}

impl DisplayState {
    /// Every region reset, with the error as the status line
    #[must_use]
    pub fn failed(err: &GustError) -> Self {
        Self {
            status: StatusMessage::danger(err.user_message()),
            ..Self::default()
        }
    }
}

/// Result of one successful search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub property: Option<PropertyConfig>,
    pub geocode: GeocodeResult,
    /// Forecast location label shown to the user
    pub location_name: String,
    pub location_info: String,
    pub forecast_horizon: ForecastHorizon,
    pub status: StatusMessage,
    pub dashboard: Dashboard,
    pub searched_at: DateTime<Utc>,
}

/// Marks a search as in flight for as long as it lives
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Orchestrates searches and owns the display state
pub struct Monitor {
    geocoder: Arc<dyn GeocodeSource>,
    weather: Arc<dyn WeatherSource>,
    properties: Vec<PropertyConfig>,
    settings: MonitorConfig,
    generation: AtomicU64,
    in_flight: AtomicUsize,
    state: RwLock<DisplayState>,
}

impl Monitor {
    pub fn new(
        geocoder: Arc<dyn GeocodeSource>,
        weather: Arc<dyn WeatherSource>,
        properties: Vec<PropertyConfig>,
        settings: MonitorConfig,
    ) -> Self {
        Self {
            geocoder,
            weather,
            properties,
            settings,
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            state: RwLock::new(DisplayState::default()),
        }
    }

    /// Wire the HTTP collaborators described by `config`
    pub fn from_config(config: &GustWatchConfig) -> Result<Self> {
        let geocoder = PostcodesClient::new(&config.geocoding.base_url, config.geocoding.timeout())?;
        let weather = MetOfficeClient::new(config.weather.route(), config.weather.timeout())?;

        Ok(Self::new(
            Arc::new(geocoder),
            Arc::new(weather),
            config.properties.clone(),
            config.monitor.clone(),
        ))
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyConfig] {
        &self.properties
    }

    /// True while any search is in flight; the search control stays disabled
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Snapshot of the display state
    pub async fn display(&self) -> DisplayState {
        self.state.read().await.clone()
    }

    /// Run a search for a property name or postcode
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        self.search_at(query, Utc::now()).await
    }

    /// Run a search with an explicit "now"
    #[instrument(skip(self, now))]
    pub async fn search_at(&self, query: &str, now: DateTime<Utc>) -> Result<SearchOutcome> {
        let query = match self.check_query(query) {
            Ok(query) => query,
            Err(err) => {
                self.set_status(StatusMessage::danger(err.user_message())).await;
                return Err(err);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlightGuard::enter(&self.in_flight);
        self.set_status(StatusMessage::info(SEARCHING_STATUS)).await;

        let result = self.run_search(query, now).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding results of superseded search for {}", query);
            return Err(GustError::Superseded);
        }

        match result {
            Ok(outcome) => {
                *state = DisplayState {
                    status: outcome.status.clone(),
                    location_info: outcome.location_info.clone(),
                    dashboard: outcome.dashboard.clone(),
                };
                Ok(outcome)
            }
            Err(err) => {
                error!("Search for {} failed: {}", query, err);
                *state = DisplayState::failed(&err);
                Err(err)
            }
        }
    }

    /// Run a search without touching the display state or the generation.
    ///
    /// For callers that each own their result, such as concurrent API
    /// clients; they never supersede one another.
    #[instrument(skip(self, now))]
    pub async fn evaluate(&self, query: &str, now: DateTime<Utc>) -> Result<SearchOutcome> {
        let query = self.check_query(query)?;
        self.run_search(query, now).await
    }

    fn check_query<'q>(&self, query: &'q str) -> Result<&'q str> {
        if !self.weather.is_configured() {
            return Err(GustError::missing_configuration(MISSING_KEY));
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(GustError::validation(EMPTY_QUERY));
        }
        Ok(query)
    }

    async fn run_search(&self, query: &str, now: DateTime<Utc>) -> Result<SearchOutcome> {
        let property = PropertyConfig::find(&self.properties, query).cloned();
        let postcode = property.as_ref().map_or(query, |p| p.postcode.as_str());

        let geocode = self.geocoder.lookup(postcode).await?;

        let (forecast_data, observation_data) = futures::future::try_join(
            self.weather
                .fetch(Endpoint::ThreeHourly, geocode.latitude, geocode.longitude),
            self.weather
                .fetch(Endpoint::Hourly, geocode.latitude, geocode.longitude),
        )
        .await?;

        let location_name = property
            .as_ref()
            .and_then(|p| p.forecast_location.clone())
            .or_else(|| extract_location_name(&forecast_data))
            .unwrap_or_else(|| geocode.label.clone());

        let location_info = match &property {
            Some(p) => format!(
                "{location_name}. Nearest monitoring location to {} {}",
                p.name, p.postcode
            ),
            None => format!(
                "{location_name}. Nearest monitoring location to {}",
                geocode.label
            ),
        };

        let horizon = self.settings.forecast_horizon;
        let forecast = forecast_window(&extract_time_series(&forecast_data), now, horizon.duration());
        let history = extract_time_series(&observation_data);
        debug!(
            "Forecast records in window: {}, observation records: {}",
            forecast.len(),
            history.len()
        );

        let dashboard = Dashboard::build(&history, &forecast, now, self.settings.chart_span());
        let status = dashboard.status();
        info!("{} at {}: {}", query, location_name, dashboard.severity);

        Ok(SearchOutcome {
            property,
            geocode,
            location_name,
            location_info,
            forecast_horizon: horizon,
            status,
            dashboard,
            searched_at: now,
        })
    }

    async fn set_status(&self, status: StatusMessage) {
        self.state.write().await.status = status;
    }
}
