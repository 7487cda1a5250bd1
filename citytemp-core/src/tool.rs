//! The `find_temperature` tool: validation, geocoding, forecast and
//! aggregation chained into one call that never fails outward.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::{
    aggregate::{daily_means, mean_of_daily_means},
    config::Settings,
    error::TemperatureError,
    model::{Query, Report, ToolOutcome},
    provider::{ForecastSource, Geocoder, NominatimClient, OpenMeteoClient, http_client},
    validate::validate,
};

pub const TOOL_NAME: &str = "find_temperature";
pub const TOOL_DESCRIPTION: &str = "Look up the latitude and longitude of an Italian city, then \
    return its current temperature, or the average temperature over the last `pastDays` days.";

/// Arguments as sent by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemperatureArgs {
    pub city: String,
    #[serde(default, rename = "pastDays", alias = "past_days")]
    pub past_days: i64,
}

/// What a host needs to register the tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME,
        description: TOOL_DESCRIPTION,
        input_schema: json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "minLength": crate::validate::MIN_CITY_LEN,
                    "description": "City name: letters, spaces and apostrophes only"
                },
                "pastDays": {
                    "type": "integer",
                    "minimum": 0,
                    "default": 0,
                    "description": "0 for the current temperature, otherwise the number of past days to average"
                }
            },
            "required": ["city"]
        }),
    }
}

#[derive(Debug)]
pub struct TemperatureTool {
    geocoder: Box<dyn Geocoder>,
    forecasts: Box<dyn ForecastSource>,
}

impl TemperatureTool {
    pub fn new(geocoder: Box<dyn Geocoder>, forecasts: Box<dyn ForecastSource>) -> Self {
        Self { geocoder, forecasts }
    }

    /// Wire the Nominatim and Open-Meteo clients from resolved settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = http_client(settings)?;
        Ok(Self::new(
            Box::new(NominatimClient::from_settings(http.clone(), settings)),
            Box::new(OpenMeteoClient::from_settings(http, settings)),
        ))
    }

    /// Run the whole pipeline for a validated query.
    pub async fn report(&self, query: &Query) -> Result<Report, TemperatureError> {
        let coordinate = self.geocoder.locate(query.city()).await?;
        let payload = self.forecasts.forecast(coordinate, query.past_days()).await?;

        if query.wants_current() {
            return Ok(Report::Current {
                city: query.city().to_string(),
                temperature: payload.current_temperature()?,
            });
        }

        let series = payload.hourly_series()?;
        Ok(Report::Average {
            city: query.city().to_string(),
            past_days: query.past_days(),
            average: mean_of_daily_means(&series),
            daily: daily_means(&series),
        })
    }

    /// Validate raw arguments and run the pipeline.
    pub async fn run(&self, city: &str, past_days: i64) -> Result<Report, TemperatureError> {
        let query = validate(city, past_days)?;
        self.report(&query).await
    }

    /// Tool entry point. Every failure, panics included, comes back as
    /// [`ToolOutcome::Failure`].
    pub async fn call(&self, city: &str, past_days: i64) -> ToolOutcome {
        let result = AssertUnwindSafe(self.run(city, past_days))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(TemperatureError::Unexpected(
                    "temperature pipeline panicked".to_string(),
                ))
            });

        match result {
            Ok(report) => ToolOutcome::Success(report.to_string()),
            Err(err) => {
                warn!(city, past_days, kind = %err.kind(), "{err}");
                err.into()
            }
        }
    }

    /// Host-facing entry point: JSON arguments in, wire JSON out.
    pub async fn call_json(&self, args: Value) -> Value {
        let outcome = match serde_json::from_value::<TemperatureArgs>(args) {
            Ok(args) => self.call(&args.city, args.past_days).await,
            Err(e) => {
                let err = TemperatureError::Validation(e.to_string());
                warn!(kind = %err.kind(), "{err}");
                err.into()
            }
        };
        outcome.to_json()
    }
}
