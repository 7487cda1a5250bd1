use serde::Deserialize;
use serde_json::Value;

use crate::{
    aggregate::format_one_decimal,
    error::{ErrorKind, TemperatureError},
};

/// A validated tool invocation. Obtained through [`crate::validate::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    city: String,
    past_days: u32,
}

impl Query {
    pub(crate) fn new(city: String, past_days: u32) -> Self {
        Self { city, past_days }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn past_days(&self) -> u32 {
        self.past_days
    }

    /// `true` when the caller wants the instantaneous reading rather than an average.
    pub fn wants_current(&self) -> bool {
        self.past_days == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Hourly readings, index-aligned: `timestamps[i]` belongs to `temperatures[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    timestamps: Vec<String>,
    temperatures: Vec<f64>,
}

impl HourlySeries {
    pub fn new(timestamps: Vec<String>, temperatures: Vec<f64>) -> Result<Self, TemperatureError> {
        if timestamps.len() != temperatures.len() {
            return Err(TemperatureError::Parse(format!(
                "hourly series has {} timestamps but {} temperatures",
                timestamps.len(),
                temperatures.len()
            )));
        }
        if timestamps.is_empty() {
            return Err(TemperatureError::Parse("hourly series is empty".to_string()));
        }

        Ok(Self { timestamps, temperatures })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn readings(&self) -> impl Iterator<Item = (&str, f64)> {
        self.timestamps
            .iter()
            .map(String::as_str)
            .zip(self.temperatures.iter().copied())
    }
}

#[derive(Debug, Deserialize)]
struct HourlyWire {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
}

/// Forecast document exactly as returned by the forecast service.
///
/// Which fields matter depends on the query, so the payload is kept raw and
/// the accessors below pull out what the orchestrator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPayload(Value);

impl ForecastPayload {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn current_temperature(&self) -> Result<f64, TemperatureError> {
        self.0
            .get("current_weather")
            .and_then(|current| current.get("temperature"))
            .and_then(Value::as_f64)
            .ok_or(TemperatureError::FieldMissing("current_weather.temperature"))
    }

    pub fn hourly_series(&self) -> Result<HourlySeries, TemperatureError> {
        let hourly = self
            .0
            .get("hourly")
            .ok_or_else(|| TemperatureError::Parse("payload has no `hourly` block".to_string()))?;

        let wire = HourlyWire::deserialize(hourly)
            .map_err(|e| TemperatureError::Parse(format!("unreadable `hourly` block: {e}")))?;

        HourlySeries::new(wire.time, wire.temperature_2m)
    }
}

/// Mean temperature of one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMean {
    pub day: String,
    pub mean: f64,
}

/// Successful answer to a query, before it is flattened into the wire string.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Current {
        city: String,
        temperature: f64,
    },
    Average {
        city: String,
        past_days: u32,
        /// Unrounded; only the message rounds it.
        average: f64,
        daily: Vec<DailyMean>,
    },
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Current { city, temperature } => {
                // as received upstream, `21.0` stays `21.0`
                write!(f, "current temperature in {city} is {temperature:?}°C")
            }
            Report::Average { city, past_days, average, .. } => write!(
                f,
                "average temperature over last {past_days} days in {city} is {}°C",
                format_one_decimal(*average)
            ),
        }
    }
}

/// Result of one tool invocation.
///
/// On the wire a success is a bare JSON string and a failure is
/// `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(String),
    Failure { kind: ErrorKind, message: String },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success(_))
    }

    pub fn to_json(&self) -> Value {
        match self {
            ToolOutcome::Success(text) => Value::String(text.clone()),
            ToolOutcome::Failure { message, .. } => serde_json::json!({ "error": message }),
        }
    }
}

impl From<TemperatureError> for ToolOutcome {
    fn from(err: TemperatureError) -> Self {
        ToolOutcome::Failure {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}
