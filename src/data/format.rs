//! Response formatter turning provider JSON into display records
//!
//! Provider payloads are read through partial structs where every field is
//! optional and a value of the wrong JSON type reads as absent. Extraction is
//! total: a missing sub-object or field yields the neutral default, never an
//! error.

use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::tables::weekday_label;
use super::{CurrentWeather, DailyForecast};
use crate::config::Lang;

/// Placeholder for missing names and condition texts
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for dates and weekdays that cannot be derived
const NO_DATE: &str = "--";

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.trunc() as i64)))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

/// Current-conditions response (`/current.json`)
#[derive(Debug, Default, Deserialize)]
struct RawCurrentResponse {
    #[serde(default, deserialize_with = "lenient")]
    location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient")]
    current: Option<RawCurrent>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLocation {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    region: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    localtime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCondition {
    #[serde(default, deserialize_with = "lenient_string")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    code: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCurrent {
    #[serde(default, deserialize_with = "lenient_string")]
    last_updated: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    temp_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    feelslike_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    is_day: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    condition: Option<RawCondition>,
    #[serde(default, deserialize_with = "lenient_f64")]
    wind_kph: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    wind_degree: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    wind_dir: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pressure_mb: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    humidity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    vis_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    uv: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    gust_kph: Option<f64>,
}

/// Forecast response (`/forecast.json`)
#[derive(Debug, Default, Deserialize)]
struct RawForecastResponse {
    #[serde(default, deserialize_with = "lenient")]
    forecast: Option<RawForecast>,
}

#[derive(Debug, Default, Deserialize)]
struct RawForecast {
    #[serde(default, deserialize_with = "lenient")]
    forecastday: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawForecastDay {
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    day: Option<RawDay>,
    #[serde(default, deserialize_with = "lenient")]
    astro: Option<RawAstro>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDay {
    #[serde(default, deserialize_with = "lenient_f64")]
    maxtemp_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    mintemp_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    avgtemp_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    maxwind_kph: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    totalprecip_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    avghumidity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    daily_chance_of_rain: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    daily_chance_of_snow: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    condition: Option<RawCondition>,
    #[serde(default, deserialize_with = "lenient_f64")]
    uv: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAstro {
    #[serde(default, deserialize_with = "lenient_string")]
    sunrise: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    sunset: Option<String>,
}

/// Rounds half-way values toward positive infinity (-2.5 becomes -2)
fn round_temp(value: Option<f64>) -> i64 {
    value
        .filter(|v| v.is_finite())
        .map(|v| (v + 0.5).floor() as i64)
        .unwrap_or(0)
}

/// Derives the weekday label from a `YYYY-MM-DD` date string
fn weekday_for(date: &str, lang: Lang) -> String {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| weekday_label(d.weekday(), lang).to_string())
        .unwrap_or_else(|_| NO_DATE.to_string())
}

/// Flattens a current-conditions payload
pub fn format_current(data: &Value) -> CurrentWeather {
    let raw = RawCurrentResponse::deserialize(data).unwrap_or_default();
    let location = raw.location.unwrap_or_default();
    let mut current = raw.current.unwrap_or_default();
    let condition = current.condition.take().unwrap_or_default();

    CurrentWeather {
        city: location.name.unwrap_or_else(|| UNKNOWN.to_string()),
        country: location.country.unwrap_or_default(),
        region: location.region.unwrap_or_default(),
        temp: round_temp(current.temp_c),
        feels_like: round_temp(current.feelslike_c),
        condition: condition.text.unwrap_or_else(|| UNKNOWN.to_string()),
        code: condition.code.unwrap_or(0),
        wind_kph: current.wind_kph.unwrap_or(0.0),
        wind_dir: current.wind_dir.unwrap_or_default(),
        wind_degree: current.wind_degree.unwrap_or(0),
        pressure_mb: current.pressure_mb.unwrap_or(0.0),
        humidity: current.humidity.unwrap_or(0),
        visibility_km: current.vis_km.unwrap_or(0.0),
        uv: current.uv.unwrap_or(0.0),
        gust_kph: current.gust_kph.unwrap_or(0.0),
        is_day: current.is_day == Some(1),
        last_updated: current.last_updated.unwrap_or_default(),
        local_time: location.localtime.unwrap_or_default(),
    }
}

/// Flattens a forecast payload into one record per returned day
///
/// An absent or empty `forecast.forecastday` yields an empty list.
pub fn format_forecast(data: &Value, lang: Lang) -> Vec<DailyForecast> {
    let raw = RawForecastResponse::deserialize(data).unwrap_or_default();
    let days = raw
        .forecast
        .and_then(|f| f.forecastday)
        .unwrap_or_default();

    days.iter()
        .map(|item| {
            let item = RawForecastDay::deserialize(item).unwrap_or_default();
            let day = item.day.unwrap_or_default();
            let condition = day.condition.unwrap_or_default();
            let astro = item.astro.unwrap_or_default();
            let date = item.date.unwrap_or_default();

            DailyForecast {
                weekday: weekday_for(&date, lang),
                date,
                temp_max: round_temp(day.maxtemp_c),
                temp_min: round_temp(day.mintemp_c),
                temp_avg: round_temp(day.avgtemp_c),
                condition: condition.text.unwrap_or_else(|| UNKNOWN.to_string()),
                code: condition.code.unwrap_or(0),
                wind_max_kph: day.maxwind_kph.unwrap_or(0.0),
                precip_mm: day.totalprecip_mm.unwrap_or(0.0),
                humidity: day.avghumidity.unwrap_or(0),
                uv: day.uv.unwrap_or(0.0),
                chance_of_rain: day.daily_chance_of_rain.unwrap_or(0),
                chance_of_snow: day.daily_chance_of_snow.unwrap_or(0),
                sunrise: astro.sunrise,
                sunset: astro.sunset,
            }
        })
        .collect()
}

/// Shortens `YYYY-MM-DD` to `MM-DD`; other inputs pass through
pub fn short_date(date: &str) -> String {
    if date.is_empty() {
        return NO_DATE.to_string();
    }
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [_, month, day] => format!("{}-{}", month, day),
        _ => date.to_string(),
    }
}

/// Extracts `HH:MM` from a `YYYY-MM-DD HH:MM` timestamp; other inputs pass through
pub fn clock_time(timestamp: &str) -> String {
    let parts: Vec<&str> = timestamp.split(' ').collect();
    match parts.as_slice() {
        [_, time] => time.chars().take(5).collect(),
        _ => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Trimmed WeatherAPI `/current.json` response
    const CURRENT_RESPONSE: &str = r#"{
        "location": {
            "name": "Beijing",
            "region": "Beijing",
            "country": "China",
            "lat": 39.93,
            "lon": 116.39,
            "tz_id": "Asia/Shanghai",
            "localtime_epoch": 1721033400,
            "localtime": "2024-07-15 16:50"
        },
        "current": {
            "last_updated_epoch": 1721033100,
            "last_updated": "2024-07-15 16:45",
            "temp_c": 31.5,
            "is_day": 1,
            "condition": {
                "text": "局部多云",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "wind_kph": 13.0,
            "wind_degree": 160,
            "wind_dir": "SSE",
            "pressure_mb": 1003.0,
            "precip_mm": 0.0,
            "humidity": 55,
            "cloud": 50,
            "feelslike_c": 35.2,
            "vis_km": 10.0,
            "uv": 7.0,
            "gust_kph": 16.4
        }
    }"#;

    /// Trimmed WeatherAPI `/forecast.json` response with three days
    const FORECAST_RESPONSE: &str = r#"{
        "location": {"name": "Beijing"},
        "current": {"temp_c": 31.5},
        "forecast": {
            "forecastday": [
                {
                    "date": "2024-07-15",
                    "day": {
                        "maxtemp_c": 33.4,
                        "mintemp_c": 24.6,
                        "avgtemp_c": 28.5,
                        "maxwind_kph": 15.1,
                        "totalprecip_mm": 0.2,
                        "avghumidity": 58,
                        "daily_chance_of_rain": 20,
                        "daily_chance_of_snow": 0,
                        "condition": {"text": "晴", "code": 1000},
                        "uv": 9.0
                    },
                    "astro": {"sunrise": "04:58 AM", "sunset": "07:42 PM"}
                },
                {
                    "date": "2024-07-16",
                    "day": {
                        "maxtemp_c": 30.0,
                        "mintemp_c": 23.5,
                        "avgtemp_c": 26.1,
                        "condition": {"text": "雷阵雨", "code": 1087}
                    }
                },
                {
                    "date": "2024-07-17"
                }
            ]
        }
    }"#;

    fn current_fixture() -> Value {
        serde_json::from_str(CURRENT_RESPONSE).expect("Fixture should parse")
    }

    fn forecast_fixture() -> Value {
        serde_json::from_str(FORECAST_RESPONSE).expect("Fixture should parse")
    }

    #[test]
    fn test_format_current_extracts_all_fields() {
        let weather = format_current(&current_fixture());

        assert_eq!(weather.city, "Beijing");
        assert_eq!(weather.country, "China");
        assert_eq!(weather.region, "Beijing");
        assert_eq!(weather.temp, 32);
        assert_eq!(weather.feels_like, 35);
        assert_eq!(weather.condition, "局部多云");
        assert_eq!(weather.code, 1003);
        assert!((weather.wind_kph - 13.0).abs() < 0.01);
        assert_eq!(weather.wind_dir, "SSE");
        assert_eq!(weather.wind_degree, 160);
        assert!((weather.pressure_mb - 1003.0).abs() < 0.01);
        assert_eq!(weather.humidity, 55);
        assert!((weather.visibility_km - 10.0).abs() < 0.01);
        assert!((weather.uv - 7.0).abs() < 0.01);
        assert!((weather.gust_kph - 16.4).abs() < 0.01);
        assert!(weather.is_day);
        assert_eq!(weather.last_updated, "2024-07-15 16:45");
        assert_eq!(weather.local_time, "2024-07-15 16:50");
    }

    #[test]
    fn test_format_current_missing_condition_uses_defaults() {
        let mut data = current_fixture();
        data["current"]
            .as_object_mut()
            .expect("current should be an object")
            .remove("condition");

        let weather = format_current(&data);

        assert_eq!(weather.condition, "Unknown");
        assert_eq!(weather.code, 0);
        assert_eq!(crate::data::icon_for(&weather.condition), crate::data::tables::DEFAULT_ICON);
        assert_eq!(weather.city, "Beijing", "Other fields are still extracted");
    }

    #[test]
    fn test_format_current_empty_payload() {
        assert_eq!(format_current(&json!({})), CurrentWeather::default());
        assert_eq!(format_current(&Value::Null), CurrentWeather::default());
        assert_eq!(format_current(&json!([1, 2])), CurrentWeather::default());
    }

    #[test]
    fn test_format_current_wrong_types_read_as_absent() {
        let data = json!({
            "location": {"name": 42, "country": "China"},
            "current": {
                "temp_c": "hot",
                "humidity": 61.0,
                "condition": "Sunny",
                "is_day": true
            }
        });

        let weather = format_current(&data);

        assert_eq!(weather.city, "Unknown");
        assert_eq!(weather.country, "China");
        assert_eq!(weather.temp, 0);
        assert_eq!(weather.humidity, 61);
        assert_eq!(weather.condition, "Unknown");
        assert!(!weather.is_day);
    }

    #[test]
    fn test_format_current_empty_name_falls_back() {
        let data = json!({"location": {"name": ""}});
        assert_eq!(format_current(&data).city, "Unknown");
    }

    #[test]
    fn test_round_temp_rounds_half_up() {
        assert_eq!(round_temp(Some(21.5)), 22);
        assert_eq!(round_temp(Some(21.49)), 21);
        assert_eq!(round_temp(Some(-2.5)), -2);
        assert_eq!(round_temp(Some(-2.6)), -3);
        assert_eq!(round_temp(None), 0);
    }

    #[test]
    fn test_format_forecast_one_record_per_day() {
        let days = format_forecast(&forecast_fixture(), Lang::En);

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, "2024-07-15");
        assert_eq!(days[1].date, "2024-07-16");
        assert_eq!(days[2].date, "2024-07-17");
    }

    #[test]
    fn test_format_forecast_extracts_day_fields() {
        let days = format_forecast(&forecast_fixture(), Lang::En);
        let first = &days[0];

        assert_eq!(first.temp_max, 33);
        assert_eq!(first.temp_min, 25);
        assert_eq!(first.temp_avg, 29);
        assert_eq!(first.condition, "晴");
        assert_eq!(first.code, 1000);
        assert!((first.wind_max_kph - 15.1).abs() < 0.01);
        assert!((first.precip_mm - 0.2).abs() < 0.01);
        assert_eq!(first.humidity, 58);
        assert!((first.uv - 9.0).abs() < 0.01);
        assert_eq!(first.chance_of_rain, 20);
        assert_eq!(first.chance_of_snow, 0);
        assert_eq!(first.sunrise.as_deref(), Some("04:58 AM"));
        assert_eq!(first.sunset.as_deref(), Some("07:42 PM"));
    }

    #[test]
    fn test_format_forecast_partial_days_use_defaults() {
        let days = format_forecast(&forecast_fixture(), Lang::En);

        assert!(days[1].sunrise.is_none());
        assert_eq!(days[1].chance_of_rain, 0);
        assert_eq!(days[2].condition, "Unknown");
        assert_eq!(days[2].temp_max, 0);
        assert!(days[2].sunset.is_none());
    }

    #[test]
    fn test_format_forecast_derives_weekday_from_date() {
        let en = format_forecast(&forecast_fixture(), Lang::En);
        assert_eq!(en[0].weekday, "Mon");
        assert_eq!(en[1].weekday, "Tue");
        assert_eq!(en[2].weekday, "Wed");

        let zh = format_forecast(&forecast_fixture(), Lang::Zh);
        assert_eq!(zh[0].weekday, "周一");
    }

    #[test]
    fn test_format_forecast_ignores_provider_weekday() {
        let data = json!({
            "forecast": {"forecastday": [{"date": "2024-07-20", "weekday": "Mon"}]}
        });

        let days = format_forecast(&data, Lang::En);

        assert_eq!(days[0].weekday, "Sat");
    }

    #[test]
    fn test_format_forecast_bad_date_gets_placeholder_weekday() {
        let data = json!({"forecast": {"forecastday": [{"date": "tomorrow"}, {}]}});

        let days = format_forecast(&data, Lang::En);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].weekday, "--");
        assert_eq!(days[1].date, "");
        assert_eq!(days[1].weekday, "--");
    }

    #[test]
    fn test_format_forecast_empty_or_absent_list() {
        assert!(format_forecast(&json!({"forecast": {"forecastday": []}}), Lang::En).is_empty());
        assert!(format_forecast(&json!({"forecast": {}}), Lang::En).is_empty());
        assert!(format_forecast(&json!({}), Lang::En).is_empty());
        assert!(format_forecast(&json!({"forecast": {"forecastday": "none"}}), Lang::En).is_empty());
        assert!(format_forecast(&Value::Null, Lang::Zh).is_empty());
    }

    #[test]
    fn test_format_forecast_non_object_day_still_counts() {
        let data = json!({"forecast": {"forecastday": [null, {"date": "2024-07-15"}]}});

        let days = format_forecast(&data, Lang::En);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].condition, "Unknown");
        assert_eq!(days[1].weekday, "Mon");
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date("2024-07-15"), "07-15");
        assert_eq!(short_date("July 15"), "July 15");
        assert_eq!(short_date(""), "--");
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time("2024-07-15 16:50"), "16:50");
        assert_eq!(clock_time("2024-07-15 9:05:33"), "9:05:");
        assert_eq!(clock_time("16:50"), "16:50");
        assert_eq!(clock_time(""), "");
    }
}
