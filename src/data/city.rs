//! Static city tables
//!
//! The home grid shows a fixed list of popular cities, and the search box
//! offers a longer list of quick picks. Queries typed in Chinese are mapped
//! to the English names the provider resolves reliably.

use std::borrow::Cow;

/// Cities loaded on the home grid
pub static POPULAR_CITIES: [&str; 6] = [
    "Beijing",
    "Shanghai",
    "Guangzhou",
    "Shenzhen",
    "Hangzhou",
    "Chengdu",
];

/// Cities offered as one-key quick picks
pub static QUICK_CITIES: [&str; 10] = [
    "Beijing",
    "Shanghai",
    "Guangzhou",
    "Shenzhen",
    "Hangzhou",
    "Chengdu",
    "Wuhan",
    "Chongqing",
    "Xi'an",
    "Nanjing",
];

/// Chinese city names and the English query sent to the provider
static CITY_TRANSLATIONS: [(&str, &str); 16] = [
    ("北京", "Beijing"),
    ("上海", "Shanghai"),
    ("广州", "Guangzhou"),
    ("深圳", "Shenzhen"),
    ("杭州", "Hangzhou"),
    ("成都", "Chengdu"),
    ("武汉", "Wuhan"),
    ("重庆", "Chongqing"),
    ("西安", "Xi'an"),
    ("南京", "Nanjing"),
    ("天津", "Tianjin"),
    ("苏州", "Suzhou"),
    ("长沙", "Changsha"),
    ("郑州", "Zhengzhou"),
    ("青岛", "Qingdao"),
    ("厦门", "Xiamen"),
];

/// Returns the quick-pick city at a zero-based position
pub fn quick_city(index: usize) -> Option<&'static str> {
    QUICK_CITIES.get(index).copied()
}

/// Turns user input into the provider `q` parameter
///
/// Known Chinese names are translated; anything else is passed through
/// trimmed. Untranslated non-English names are not guaranteed to resolve.
pub fn query_name(name: &str) -> Cow<'_, str> {
    let trimmed = name.trim();
    match CITY_TRANSLATIONS.iter().find(|(zh, _)| *zh == trimmed) {
        Some((_, en)) => Cow::Borrowed(en),
        None => {
            tracing::debug!(city = trimmed, "no translation entry, querying as-is");
            Cow::Borrowed(trimmed)
        }
    }
}
