//! Weather data: provider client, response formatting and view models
//!
//! `weather` wraps provider requests with the short-lived response cache,
//! `format` flattens provider JSON into the records below, and `tables` and
//! `city` hold the static lookups used by rendering.

pub mod city;
pub mod format;
pub mod tables;
pub mod weather;

pub use city::{query_name, POPULAR_CITIES, QUICK_CITIES};
pub use format::{clock_time, format_current, format_forecast, short_date};
pub use tables::{icon_for, weekday_label, wind_arrow};
pub use weather::{ApiError, Fetched, QueryParams, RequestResult, WeatherApiClient};

use serde::{Deserialize, Serialize};

/// Current conditions for one location, flattened for display
///
/// Every field has a neutral default so a partial provider payload still
/// produces a complete record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Location name as resolved by the provider
    pub city: String,
    pub country: String,
    pub region: String,
    /// Temperature in Celsius, rounded
    pub temp: i64,
    /// Feels-like temperature in Celsius, rounded
    pub feels_like: i64,
    /// Condition text in the requested language
    pub condition: String,
    /// Provider condition code
    pub code: i64,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// 16-point compass direction (e.g. "NNE")
    pub wind_dir: String,
    pub wind_degree: i64,
    pub pressure_mb: f64,
    /// Relative humidity percentage
    pub humidity: i64,
    pub visibility_km: f64,
    pub uv: f64,
    pub gust_kph: f64,
    pub is_day: bool,
    /// Provider's "last updated" local timestamp (`YYYY-MM-DD HH:MM`)
    pub last_updated: String,
    /// Local time at the location (`YYYY-MM-DD HH:MM`)
    pub local_time: String,
}

impl Default for CurrentWeather {
    fn default() -> Self {
        Self {
            city: format::UNKNOWN.to_string(),
            country: String::new(),
            region: String::new(),
            temp: 0,
            feels_like: 0,
            condition: format::UNKNOWN.to_string(),
            code: 0,
            wind_kph: 0.0,
            wind_dir: String::new(),
            wind_degree: 0,
            pressure_mb: 0.0,
            humidity: 0,
            visibility_km: 0.0,
            uv: 0.0,
            gust_kph: 0.0,
            is_day: false,
            last_updated: String::new(),
            local_time: String::new(),
        }
    }
}

/// One calendar day of forecast, flattened for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Date as returned by the provider (`YYYY-MM-DD`)
    pub date: String,
    /// Weekday label computed from `date`
    pub weekday: String,
    pub temp_max: i64,
    pub temp_min: i64,
    pub temp_avg: i64,
    pub condition: String,
    pub code: i64,
    pub wind_max_kph: f64,
    pub precip_mm: f64,
    pub humidity: i64,
    pub uv: f64,
    /// Chance of rain in percent
    pub chance_of_rain: i64,
    /// Chance of snow in percent
    pub chance_of_snow: i64,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}
