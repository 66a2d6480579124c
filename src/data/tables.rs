//! Lookup tables for icons, weekday labels and wind arrows
//!
//! All lookups are total: an unrecognized key maps to a fixed default
//! rather than failing.

use chrono::Weekday;

use crate::config::Lang;

/// Glyph used when a condition text has no entry
pub const DEFAULT_ICON: &str = "\u{1F324}\u{FE0F}"; // 🌤️

/// Glyph used when a wind direction has no entry
pub const DEFAULT_WIND_ARROW: &str = "\u{00B7}"; // ·

const SUN: &str = "\u{2600}\u{FE0F}"; // ☀️
const PARTLY_CLOUDY: &str = "\u{26C5}"; // ⛅
const CLOUD: &str = "\u{2601}\u{FE0F}"; // ☁️
const RAIN: &str = "\u{1F327}\u{FE0F}"; // 🌧️
const SNOW: &str = "\u{2744}\u{FE0F}"; // ❄️
const SNOWMAN: &str = "\u{26C4}"; // ⛄
const STORM: &str = "\u{26C8}\u{FE0F}"; // ⛈️
const FOG: &str = "\u{1F32B}\u{FE0F}"; // 🌫️
const TORNADO: &str = "\u{1F32A}\u{FE0F}"; // 🌪️

/// Maps a provider condition text (English or Chinese) to a glyph
pub fn icon_for(condition: &str) -> &'static str {
    match condition.trim() {
        "Sunny" | "Clear" | "晴天" | "晴" | "晴朗" => SUN,
        "Partly cloudy" | "少云" | "局部多云" => PARTLY_CLOUDY,
        "Cloudy" | "Overcast" | "阴" | "阴天" => CLOUD,
        "Rain" | "Light rain" | "Moderate rain" | "Heavy rain" | "小雨" | "中雨" | "大雨" => {
            RAIN
        }
        "Snow" | "Light snow" | "Moderate snow" | "小雪" | "中雪" | "大雪" => SNOW,
        "Heavy snow" | "暴雪" => SNOWMAN,
        "Thunder" | "Thunderstorm" | "暴雨" | "雷阵雨" => STORM,
        "Fog" | "Mist" | "Haze" | "雾" | "薄雾" | "霾" => FOG,
        "沙尘暴" => TORNADO,
        _ => DEFAULT_ICON,
    }
}

/// Short weekday label in the given language
pub fn weekday_label(weekday: Weekday, lang: Lang) -> &'static str {
    const EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    const ZH: [&str; 7] = ["周日", "周一", "周二", "周三", "周四", "周五", "周六"];

    let index = weekday.num_days_from_sunday() as usize;
    match lang {
        Lang::En => EN[index],
        Lang::Zh => ZH[index],
    }
}

/// Maps a 16-point compass direction to the arrow the wind blows toward
pub fn wind_arrow(direction: &str) -> &'static str {
    match direction.trim() {
        "N" | "NNE" => "\u{2193}",   // ↓
        "NE" | "ENE" => "\u{2199}",  // ↙
        "E" | "ESE" => "\u{2190}",   // ←
        "SE" | "SSE" => "\u{2196}",  // ↖
        "S" | "SSW" => "\u{2191}",   // ↑
        "SW" | "WSW" => "\u{2197}",  // ↗
        "W" | "WNW" => "\u{2192}",   // →
        "NW" | "NNW" => "\u{2198}",  // ↘
        _ => DEFAULT_WIND_ARROW,
    }
}
