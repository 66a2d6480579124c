//! Runtime configuration for the weather client and application
//!
//! Defaults mirror the hosted WeatherAPI service: a 10 second request
//! deadline, a 5 minute response cache under the `weather_` key prefix,
//! and Chinese-language condition texts.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::data::city::POPULAR_CITIES;

/// Default WeatherAPI base URL
pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Language used for provider condition texts and weekday labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    En,
    #[default]
    Zh,
}

impl Lang {
    /// Value sent as the provider's `lang` query parameter
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        }
    }

}

/// A language code outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language '{0}'")]
pub struct UnknownLang(pub String);

impl FromStr for Lang {
    type Err = UnknownLang;

    /// Parses a language code, accepting a few common spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Lang::En),
            "zh" | "zh-cn" | "chinese" => Ok(Lang::Zh),
            _ => Err(UnknownLang(s.to_string())),
        }
    }
}

/// Settings for talking to the weather provider
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoints such as `/current.json` are appended
    pub base_url: String,
    /// Provider API key, sent as the `key` query parameter
    pub api_key: String,
    /// Deadline for a single request, including reading the body
    pub timeout: Duration,
    /// Number of days requested from the forecast endpoint
    pub forecast_days: u8,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
            forecast_days: 7,
        }
    }
}

/// Settings for the response cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Global switch; when false no call reads or writes the cache
    pub enabled: bool,
    /// Time-to-live of a freshly written entry
    pub ttl: Duration,
    /// Prefix of every key written by the request cache
    pub prefix: String,
    /// Whether to remove all prefixed entries at startup
    pub clear_on_start: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(5 * 60),
            prefix: "weather_".to_string(),
            clear_on_start: true,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub lang: Lang,
    /// Cities shown on the home grid
    pub cities: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            lang: Lang::default(),
            cities: POPULAR_CITIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}
