//! Current-weather lookup against an Open-Meteo compatible API.
//!
//! A fetch never fails: every error path (transport, non-2xx, missing
//! temperature, timeout) is retried once under the weather [`RetryPolicy`]
//! and then degrades to [`WeatherReading::unavailable`].
//!
//! # Response shape
//!
//! ```json
//! { "current_weather": { "temperature": 20.4, "is_day": 1, "weathercode": 0 } }
//! ```

use crate::config::WeatherCodeTable;
use crate::models::{City, WeatherReading};
use crate::retry::{FetchError, RetryPolicy};
use futures::future;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

/// Description used when the weather code is missing or not in the table.
pub const UNKNOWN_CONDITIONS: &str = "unknown conditions";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: Option<f64>,
    #[serde(default)]
    is_day: Option<u8>,
    #[serde(default)]
    weathercode: Option<u16>,
}

/// The parts of a successful response we keep.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Observation {
    temperature: f64,
    is_day: bool,
    code: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: Url,
    policy: RetryPolicy,
    codes: Arc<WeatherCodeTable>,
}

impl WeatherClient {
    pub fn new(
        http: Client,
        base_url: Url,
        policy: RetryPolicy,
        codes: Arc<WeatherCodeTable>,
    ) -> Self {
        Self {
            http,
            base_url,
            policy,
            codes,
        }
    }

    fn forecast_url(&self, city: &City) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join("v1/forecast")
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("latitude", &city.latitude.to_string())
            .append_pair("longitude", &city.longitude.to_string())
            .append_pair("current_weather", "true");
        Ok(url)
    }

    async fn observe(&self, url: &Url) -> Result<Observation, FetchError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
        let current = parsed
            .current_weather
            .ok_or_else(|| FetchError::Parse("missing current_weather".to_string()))?;
        let temperature = current
            .temperature
            .filter(|t| t.is_finite())
            .ok_or_else(|| FetchError::Parse("missing current temperature".to_string()))?;

        Ok(Observation {
            temperature,
            is_day: current.is_day.unwrap_or(1) == 1,
            code: current.weathercode,
        })
    }

    fn describe(&self, observation: Observation) -> WeatherReading {
        let entry = observation
            .code
            .and_then(|code| self.codes.lookup(&code.to_string(), observation.is_day));

        WeatherReading {
            temperature_celsius: Some(observation.temperature.round() as i32),
            description: entry
                .map(|e| e.description.clone())
                .unwrap_or_else(|| UNKNOWN_CONDITIONS.to_string()),
            image_hint: entry.and_then(|e| e.image.clone()),
        }
    }

    /// Current weather for `city`, or the placeholder reading.
    #[instrument(level = "info", skip_all, fields(city = %city.name))]
    pub async fn fetch(&self, city: &City) -> WeatherReading {
        let url = match self.forecast_url(city) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Could not build weather URL");
                return WeatherReading::unavailable();
            }
        };

        let url = &url;
        match self.policy.run(&city.name, move || self.observe(url)).await {
            Ok(observation) => {
                let reading = self.describe(observation);
                info!(
                    temperature = ?reading.temperature_celsius,
                    description = %reading.description,
                    "Fetched weather"
                );
                reading
            }
            Err(e) => {
                warn!(error = %e, "Weather unavailable; using placeholder");
                WeatherReading::unavailable()
            }
        }
    }

    /// Fetch two cities concurrently; both must settle before returning.
    pub async fn fetch_pair(&self, a: &City, b: &City) -> (WeatherReading, WeatherReading) {
        future::join(self.fetch(a), self.fetch(b)).await
    }
}
