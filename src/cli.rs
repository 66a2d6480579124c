//! Command-line interface parsing for City Weather
//!
//! Arguments are parsed with clap and validated into a `StartupConfig`,
//! which carries the runtime `Config` and an optional city to open directly.

use clap::Parser;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Config, Lang, UnknownLang, DEFAULT_BASE_URL};

/// Largest forecast horizon the provider serves
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The language code is not supported
    #[error("Invalid language: '{0}'. Valid languages: en, zh")]
    InvalidLang(String),

    /// The forecast horizon is out of range
    #[error("Invalid forecast days: {0}. Expected 1 to 14")]
    InvalidDays(u8),

    /// The request timeout must be positive
    #[error("Invalid timeout: the request timeout must be at least 1 second")]
    InvalidTimeout,

    /// `--city` was given but blank
    #[error("Invalid city: the city name must not be empty")]
    EmptyCity,
}

/// City Weather - current conditions and forecasts for a list of cities
#[derive(Parser, Debug)]
#[command(name = "cityweather")]
#[command(about = "Current conditions and forecasts for popular cities")]
#[command(version)]
pub struct Cli {
    /// WeatherAPI key sent with every request
    #[arg(long, env = "WEATHERAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Language for condition texts and weekday labels (en, zh)
    #[arg(long, value_name = "LANG", default_value = "zh")]
    pub lang: String,

    /// Open the detail view for this city on startup
    ///
    /// Examples:
    ///   cityweather --city Beijing
    ///   cityweather --city 成都
    #[arg(long, value_name = "CITY")]
    pub city: Option<String>,

    /// Number of forecast days to request
    #[arg(long, value_name = "DAYS", default_value_t = 7)]
    pub days: u8,

    /// Never read or write the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Keep cached responses from earlier runs instead of flushing them
    #[arg(long)]
    pub keep_cache: bool,

    /// How long a cached response stays valid, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub ttl_secs: u64,

    /// Per-request deadline, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Provider base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Runtime configuration for the client and cache
    pub config: Config,
    /// City whose detail view opens once the home grid has loaded
    pub initial_city: Option<String>,
}

/// Parses a language argument into a `Lang`
pub fn parse_lang_arg(s: &str) -> Result<Lang, CliError> {
    s.parse()
        .map_err(|_: UnknownLang| CliError::InvalidLang(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the validated settings
    /// * `Err(CliError)` if any argument is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let lang = parse_lang_arg(&cli.lang)?;

        if cli.days == 0 || cli.days > MAX_FORECAST_DAYS {
            return Err(CliError::InvalidDays(cli.days));
        }
        if cli.timeout_secs == 0 {
            return Err(CliError::InvalidTimeout);
        }

        let initial_city = match &cli.city {
            Some(city) if city.trim().is_empty() => return Err(CliError::EmptyCity),
            Some(city) => Some(city.trim().to_string()),
            None => None,
        };

        let mut config = Config {
            lang,
            ..Config::default()
        };
        config.api.base_url = cli.base_url.clone();
        config.api.api_key = cli.api_key.clone().unwrap_or_default();
        config.api.timeout = Duration::from_secs(cli.timeout_secs);
        config.api.forecast_days = cli.days;
        config.cache.enabled = !cli.no_cache;
        config.cache.ttl = Duration::from_secs(cli.ttl_secs);
        config.cache.clear_on_start = !cli.keep_cache;

        Ok(StartupConfig {
            config,
            initial_city,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lang_arg_valid() {
        assert_eq!(parse_lang_arg("en").unwrap(), Lang::En);
        assert_eq!(parse_lang_arg("zh").unwrap(), Lang::Zh);
        assert_eq!(parse_lang_arg("English").unwrap(), Lang::En);
    }

    #[test]
    fn test_parse_lang_arg_invalid() {
        let err = parse_lang_arg("klingon").unwrap_err();
        assert!(err.to_string().contains("Invalid language"));
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["cityweather"]);
        assert_eq!(cli.lang, "zh");
        assert_eq!(cli.days, 7);
        assert!(cli.city.is_none());
        assert!(!cli.no_cache);
        assert!(!cli.keep_cache);
        assert_eq!(cli.ttl_secs, 300);
        assert_eq!(cli.timeout_secs, 10);
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_cli_parse_all_flags() {
        let cli = Cli::parse_from([
            "cityweather",
            "--api-key",
            "abc",
            "--lang",
            "en",
            "--city",
            "Wuhan",
            "--days",
            "3",
            "--no-cache",
            "--keep-cache",
            "--ttl-secs",
            "60",
            "--timeout-secs",
            "8",
        ]);
        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.city.as_deref(), Some("Wuhan"));
        assert!(cli.no_cache);
        assert!(cli.keep_cache);
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert!(config.initial_city.is_none());
        assert!(config.config.cache.enabled);
        assert!(config.config.cache.clear_on_start);
    }

    #[test]
    fn test_startup_config_from_cli_applies_settings() {
        let cli = Cli::parse_from([
            "cityweather",
            "--api-key",
            "abc",
            "--lang",
            "en",
            "--days",
            "3",
            "--no-cache",
            "--keep-cache",
            "--ttl-secs",
            "60",
            "--timeout-secs",
            "8",
        ]);

        let startup = StartupConfig::from_cli(&cli).unwrap();
        let config = &startup.config;

        assert_eq!(config.lang, Lang::En);
        assert_eq!(config.api.api_key, "abc");
        assert_eq!(config.api.forecast_days, 3);
        assert_eq!(config.api.timeout, Duration::from_secs(8));
        assert!(!config.cache.enabled);
        assert!(!config.cache.clear_on_start);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_startup_config_from_cli_with_city() {
        let cli = Cli::parse_from(["cityweather", "--city", "  Chengdu "]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(startup.initial_city.as_deref(), Some("Chengdu"));
    }

    #[test]
    fn test_startup_config_from_cli_rejects_blank_city() {
        let cli = Cli::parse_from(["cityweather", "--city", "   "]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::EmptyCity)
        ));
    }

    #[test]
    fn test_startup_config_from_cli_rejects_out_of_range_days() {
        let cli = Cli::parse_from(["cityweather", "--days", "0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidDays(0))
        ));

        let cli = Cli::parse_from(["cityweather", "--days", "15"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidDays(15))
        ));
    }

    #[test]
    fn test_startup_config_from_cli_rejects_zero_timeout() {
        let cli = Cli::parse_from(["cityweather", "--timeout-secs", "0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_startup_config_from_cli_invalid_lang() {
        let cli = Cli::parse_from(["cityweather", "--lang", "fr"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }
}
