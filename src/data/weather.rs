//! WeatherAPI client with a short-lived response cache
//!
//! Every request goes through `WeatherApiClient::request`, which consults the
//! injected `Store` before touching the network and stores successful
//! responses for the configured TTL. Failures of any kind come back as an
//! `ApiError` value; nothing is retried.

use reqwest::{Client, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::city::query_name;
use crate::cache::{CacheEntry, Clock, Store, StoreError, SystemClock};
use crate::config::{ApiConfig, CacheConfig, Config, Lang};

/// Current conditions endpoint
pub const CURRENT_ENDPOINT: &str = "/current.json";

/// Multi-day forecast endpoint
pub const FORECAST_ENDPOINT: &str = "/forecast.json";

/// Location autocomplete endpoint
pub const SEARCH_ENDPOINT: &str = "/search.json";

/// A successful response payload
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    /// The provider JSON, untouched
    pub data: Value,
    /// True when served from the cache without a network call
    pub from_cache: bool,
}

/// Outcome of a single request
pub type RequestResult = Result<Fetched, ApiError>;

/// Errors that can occur when requesting weather data
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the connection failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No complete response arrived before the deadline
    #[error("Request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The provider answered with a non-2xx status
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The provider answered 200 but reported an error in the body
    #[error("{message}")]
    Provider { code: Option<i64>, message: String },

    /// The response body was not valid JSON
    #[error("Invalid JSON response: {0}")]
    Decode(serde_json::Error),

    /// Base URL and endpoint did not form a valid URL
    #[error("Invalid request URL '{0}'")]
    InvalidUrl(String),
}

/// Query parameters for a provider request, kept in name order
///
/// Empty values are never stored, so they are omitted from both the
/// outgoing URL and the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter unless its value renders as an empty string
    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.0.insert(name.to_string(), value);
        }
        self
    }

    /// Adds a parameter when a value is present
    pub fn with_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Client for the WeatherAPI REST endpoints
#[derive(Clone)]
pub struct WeatherApiClient {
    http_client: Client,
    api: ApiConfig,
    cache: CacheConfig,
    lang: Lang,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.api.base_url)
            .field("timeout", &self.api.timeout)
            .field("cache_enabled", &self.cache.enabled)
            .field("lang", &self.lang)
            .finish_non_exhaustive()
    }
}

impl WeatherApiClient {
    /// Creates a client using `store` for cached responses and the system clock
    pub fn new(config: &Config, store: Arc<dyn Store>) -> Self {
        Self {
            http_client: Client::new(),
            api: config.api.clone(),
            cache: config.cache.clone(),
            lang: config.lang,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for cache expiry
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the underlying HTTP client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Language requested for condition texts
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Forecast horizon used by `forecast_default`
    pub fn forecast_days(&self) -> u8 {
        self.api.forecast_days
    }

    /// Builds the cache key for a request
    ///
    /// The key is `{prefix}{endpoint}_{q}` followed by `_{name}={value}` for
    /// each remaining parameter in name order. Names and values are
    /// percent-encoded with `_` escaped too, so separators only ever come
    /// from here. A missing `q` leaves its slot empty. The API key never
    /// appears.
    fn cache_key(&self, endpoint: &str, params: &QueryParams) -> String {
        let mut key = format!(
            "{}{}_{}",
            self.cache.prefix,
            endpoint,
            key_component(params.get("q").unwrap_or_default())
        );
        for (name, value) in params.iter().filter(|(name, _)| *name != "q") {
            key.push('_');
            key.push_str(&key_component(name));
            key.push('=');
            key.push_str(&key_component(value));
        }
        key
    }

    /// Builds the full request URL including the API key
    fn build_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.api.base_url.trim_end_matches('/'), endpoint);
        let mut url = Url::parse(&raw).map_err(|_| ApiError::InvalidUrl(raw.clone()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.api.api_key);
            for (name, value) in params.iter().filter(|(name, _)| *name != "key") {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Requests `endpoint`, serving from and populating the cache
    ///
    /// The cache is only consulted when `use_cache` is set and caching is
    /// enabled in the configuration.
    #[instrument(skip(self, params))]
    pub async fn request(
        &self,
        endpoint: &str,
        params: &QueryParams,
        use_cache: bool,
    ) -> RequestResult {
        let caching = use_cache && self.cache.enabled;
        let key = self.cache_key(endpoint, params);

        if caching {
            if let Some(data) = self.read_cache(&key) {
                debug!(key = %key, "cache hit");
                return Ok(Fetched {
                    data,
                    from_cache: true,
                });
            }
            debug!(key = %key, "cache miss");
        }

        let url = self.build_url(endpoint, params)?;
        let data = match self.fetch(url).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "weather request failed");
                return Err(e);
            }
        };

        if caching {
            self.write_cache(&key, &data);
        }

        Ok(Fetched {
            data,
            from_cache: false,
        })
    }

    /// Returns the cached payload for `key` if a valid entry exists
    ///
    /// Expired and unreadable entries are deleted and treated as a miss.
    fn read_cache(&self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        match self.store.get(key) {
            Ok(Some(entry)) if entry.is_valid(now) => Some(entry.data),
            Ok(Some(_)) => {
                debug!(key, "cache entry expired");
                self.discard(key);
                None
            }
            Ok(None) => None,
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!(error = %e, "discarding unreadable cache entry");
                self.discard(key);
                None
            }
            Err(e) => {
                warn!(error = %e, "cache read failed");
                None
            }
        }
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.store.delete(key) {
            warn!(key, error = %e, "failed to delete cache entry");
        }
    }

    fn write_cache(&self, key: &str, data: &Value) {
        let entry = CacheEntry::new(data.clone(), self.clock.now_ms(), self.cache.ttl);
        if let Err(e) = self.store.set(key, &entry) {
            warn!(key, error = %e, "cache write failed");
        }
    }

    /// Performs the GET under the configured deadline
    ///
    /// Hitting the deadline drops the in-flight request.
    async fn fetch(&self, url: Url) -> Result<Value, ApiError> {
        let deadline = self.api.timeout;
        info!(endpoint = url.path(), "fetching from provider");

        let exchange = async {
            let response = self.http_client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::Http {
                    status: status.as_u16(),
                });
            }
            let body = response.bytes().await?;
            serde_json::from_slice::<Value>(&body).map_err(ApiError::Decode)
        };

        let data = tokio::time::timeout(deadline, exchange)
            .await
            .map_err(|_| ApiError::Timeout(deadline))??;

        match provider_error(&data) {
            Some(e) => Err(e),
            None => Ok(data),
        }
    }

    /// Looks up locations matching `q`
    pub async fn search(&self, q: &str) -> RequestResult {
        let params = QueryParams::new().with("q", q.trim());
        self.request(SEARCH_ENDPOINT, &params, true).await
    }

    /// Fetches current conditions for a city
    pub async fn current(&self, city: &str) -> RequestResult {
        let params = QueryParams::new()
            .with("q", query_name(city))
            .with("lang", self.lang.code());
        self.request(CURRENT_ENDPOINT, &params, true).await
    }

    /// Fetches a `days`-day forecast for a city
    pub async fn forecast(&self, city: &str, days: u8) -> RequestResult {
        let params = QueryParams::new()
            .with("q", query_name(city))
            .with("days", days)
            .with("lang", self.lang.code());
        self.request(FORECAST_ENDPOINT, &params, true).await
    }

    /// Fetches a forecast over the configured horizon
    pub async fn forecast_default(&self, city: &str) -> RequestResult {
        self.forecast(city, self.api.forecast_days).await
    }

    /// Removes every cached response written by this client
    pub fn clear_cache(&self) -> Result<usize, StoreError> {
        let removed = self.store.clear_prefix(&self.cache.prefix)?;
        info!(removed, prefix = %self.cache.prefix, "cache cleared");
        Ok(removed)
    }
}

/// Percent-encodes one cache key component, escaping the `_` separator as well
fn key_component(raw: &str) -> String {
    urlencoding::encode(raw).replace('_', "%5F")
}

/// Extracts the provider's embedded error, if the body carries one
///
/// Falsy markers (`null`, `false`, `""`, `0`) mean no error.
fn provider_error(data: &Value) -> Option<ApiError> {
    let error = match data.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return None,
        Some(Value::String(s)) if s.is_empty() => return None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return None,
        Some(error) => error,
    };

    let message = error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .unwrap_or("Unknown provider error")
        .to_string();

    Some(ApiError::Provider {
        code: error.get("code").and_then(Value::as_i64),
        message,
    })
}
