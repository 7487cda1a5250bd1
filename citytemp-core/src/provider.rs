use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    config::Settings,
    error::TemperatureError,
    model::{Coordinate, ForecastPayload},
};

pub mod nominatim;
pub mod openmeteo;

pub use nominatim::NominatimClient;
pub use openmeteo::OpenMeteoClient;

/// Resolves a place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Coordinates of the best match for `city`. One upstream call, no retry.
    async fn locate(&self, city: &str) -> Result<Coordinate, TemperatureError>;
}

/// Fetches current and hourly weather for a coordinate.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn forecast(
        &self,
        at: Coordinate,
        past_days: u32,
    ) -> Result<ForecastPayload, TemperatureError>;
}

/// Shared HTTP client for both services, honouring the configured timeout.
pub fn http_client(settings: &Settings) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(settings.timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Clip an upstream body so it fits in a log line.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
