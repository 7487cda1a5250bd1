use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::Settings,
    error::TemperatureError,
    model::Coordinate,
    provider::{Geocoder, truncate_body},
};

/// Place search restricted to Italy, with Italian place names.
const COUNTRY_CODES: &str = "it";
const LANGUAGE: &str = "it";

/// Geocoding client for the Nominatim (OpenStreetMap) search endpoint.
///
/// Nominatim's usage policy requires an identifying `User-Agent`, so every
/// request carries the one resolved from the contact address.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(http: Client, base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_settings(http: Client, settings: &Settings) -> Self {
        Self::new(http, settings.geocoding_url.clone(), settings.user_agent.clone())
    }
}

/// Nominatim encodes coordinates as strings; accept plain numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordValue {
    Number(f64),
    Text(String),
}

impl CoordValue {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CoordValue::Number(n) => *n,
            CoordValue::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    #[serde(default)]
    lat: Option<CoordValue>,
    #[serde(default)]
    lon: Option<CoordValue>,
    #[serde(default)]
    display_name: Option<String>,
}

fn coordinate_of(place: &NmPlace) -> Result<Coordinate, TemperatureError> {
    let field = |value: &Option<CoordValue>, name: &str| {
        value
            .as_ref()
            .and_then(CoordValue::as_f64)
            .ok_or_else(|| TemperatureError::Lookup(format!("first match has no numeric `{name}`")))
    };

    Ok(Coordinate {
        latitude: field(&place.lat, "lat")?,
        longitude: field(&place.lon, "lon")?,
    })
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn locate(&self, city: &str) -> Result<Coordinate, TemperatureError> {
        let res = self
            .http
            .get(&self.base_url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[
                ("q", city),
                ("format", "json"),
                ("accept-language", LANGUAGE),
                ("countrycodes", COUNTRY_CODES),
            ])
            .send()
            .await
            .map_err(|e| TemperatureError::Lookup(format!("request to Nominatim failed: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            TemperatureError::Lookup(format!("failed to read Nominatim response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(TemperatureError::Lookup(format!(
                "Nominatim search failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        if body.trim().is_empty() {
            return Err(TemperatureError::Lookup("Nominatim returned an empty body".to_string()));
        }

        let places: Vec<NmPlace> = serde_json::from_str(&body).map_err(|e| {
            TemperatureError::Lookup(format!(
                "unparsable Nominatim response ({e}): {}",
                truncate_body(&body)
            ))
        })?;

        let first = places
            .first()
            .ok_or_else(|| TemperatureError::Lookup(format!("no place found for {city:?}")))?;

        let coordinate = coordinate_of(first)?;
        debug!(
            city,
            place = first.display_name.as_deref().unwrap_or("?"),
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "geocoded city"
        );

        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(json: &str) -> NmPlace {
        serde_json::from_str(json).expect("place should deserialize")
    }

    #[test]
    fn coordinates_from_strings_or_numbers() {
        let c = coordinate_of(&place(r#"{"lat": "41.8933", "lon": "12.4829"}"#)).unwrap();
        assert_eq!(c, Coordinate { latitude: 41.8933, longitude: 12.4829 });

        let c = coordinate_of(&place(r#"{"lat": 45.07, "lon": 7.68}"#)).unwrap();
        assert_eq!(c, Coordinate { latitude: 45.07, longitude: 7.68 });
    }

    #[test]
    fn missing_or_non_numeric_coordinates_are_lookup_errors() {
        for json in [
            r#"{"lon": "12.4"}"#,
            r#"{"lat": "41.9"}"#,
            r#"{"lat": "north", "lon": "12.4"}"#,
            r#"{"lat": "NaN", "lon": "12.4"}"#,
        ] {
            let err = coordinate_of(&place(json)).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Lookup, "{json}");
        }
    }
}
