use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::Settings,
    error::TemperatureError,
    model::{Coordinate, ForecastPayload},
    provider::{ForecastSource, truncate_body},
};

/// All timestamps in the hourly series are local to this zone.
pub const TIMEZONE: &str = "Europe/Rome";
pub const HOURLY_VARIABLE: &str = "temperature_2m";

/// Client for the Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(http: Client, settings: &Settings) -> Self {
        Self::new(http, settings.forecast_url.clone())
    }
}

fn forecast_params(at: Coordinate, past_days: u32) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", at.latitude.to_string()),
        ("longitude", at.longitude.to_string()),
        ("current_weather", "true".to_string()),
        ("timezone", TIMEZONE.to_string()),
        ("past_days", past_days.to_string()),
        ("hourly", HOURLY_VARIABLE.to_string()),
    ]
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn forecast(
        &self,
        at: Coordinate,
        past_days: u32,
    ) -> Result<ForecastPayload, TemperatureError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&forecast_params(at, past_days))
            .send()
            .await
            .map_err(|e| TemperatureError::Fetch(format!("request to Open-Meteo failed: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            TemperatureError::Fetch(format!("failed to read Open-Meteo response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(TemperatureError::Fetch(format!(
                "Open-Meteo forecast failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            TemperatureError::Unexpected(format!(
                "Open-Meteo returned non-JSON body ({e}): {}",
                truncate_body(&body)
            ))
        })?;

        debug!(
            latitude = at.latitude,
            longitude = at.longitude,
            past_days,
            "fetched forecast"
        );

        Ok(ForecastPayload::new(raw))
    }
}
