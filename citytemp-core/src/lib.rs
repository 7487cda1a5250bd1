//! Core library for the `citytemp` tool.
//!
//! This crate defines:
//! - Configuration & contact-address handling
//! - Input validation for tool calls
//! - Clients for the geocoding (Nominatim) and forecast (Open-Meteo) services
//! - Day-bucketed temperature averaging
//! - The `find_temperature` tool that chains all of the above
//!
//! It is used by `citytemp-cli`, but any agent host can register
//! [`TemperatureTool`] directly.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod tool;
pub mod validate;

pub use config::{Config, Settings};
pub use error::{ErrorKind, TemperatureError};
pub use model::{Coordinate, DailyMean, ForecastPayload, HourlySeries, Query, Report, ToolOutcome};
pub use provider::{ForecastSource, Geocoder, NominatimClient, OpenMeteoClient};
pub use tool::{TemperatureArgs, TemperatureTool, ToolDescriptor, descriptor};
pub use validate::validate;
