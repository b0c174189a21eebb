/// Endpoint registry for the Hong Kong weather bot.
///
/// Defines the canonical HKO feed URLs, the rain nowcast page, the rain
/// icons sent with a forecast, and the default nowcast location. This is
/// the single source of truth for upstream URLs: other modules take a
/// `FeedEndpoints` value (usually from `config`) rather than hardcoding them.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Feed endpoints
// ---------------------------------------------------------------------------

pub const CURRENT_WEATHER_EN: &str = "http://rss.weather.gov.hk/rss/CurrentWeather.xml";
pub const CURRENT_WEATHER_UC: &str = "http://rss.weather.gov.hk/rss/CurrentWeather_uc.xml";
pub const LOCAL_FORECAST_UC: &str = "http://rss.weather.gov.hk/rss/LocalWeatherForecast_uc.xml";
pub const SEVERAL_DAYS_FORECAST_UC: &str =
    "http://rss.weather.gov.hk/rss/SeveralDaysWeatherForecast_uc.xml";

/// The four feeds a current-weather record is assembled from.
///
/// Field names follow the feed variant keys: `en` (English current
/// conditions), `uc` (Chinese current conditions), `td` (Chinese local
/// forecast for today), `nine_day` (Chinese multi-day outlook, key `9d`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedEndpoints {
    pub en: String,
    pub uc: String,
    pub td: String,
    #[serde(rename = "9d")]
    pub nine_day: String,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            en: CURRENT_WEATHER_EN.to_string(),
            uc: CURRENT_WEATHER_UC.to_string(),
            td: LOCAL_FORECAST_UC.to_string(),
            nine_day: SEVERAL_DAYS_FORECAST_UC.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rain nowcast
// ---------------------------------------------------------------------------

/// Mobile rainfall nowcast page rendered by the external browser script.
pub const NOWCAST_PAGE_URL: &str = "https://www.weather.gov.hk/m/nowcast/hk_rainfall_uc.htm";

/// Default nowcast location (Sham Shui Po), WGS84.
pub const DEFAULT_LATITUDE: f64 = 22.3236917;
pub const DEFAULT_LONGITUDE: f64 = 114.1600986;

/// How many times the renderer may reload the page waiting for images.
pub const DEFAULT_RENDER_RETRY: u32 = 5;

/// Icon URL sent with a rain forecast, keyed by the peak intensity weight.
/// Dry samples never produce an icon.
pub static RAIN_ICON_URLS: &[(i32, &str)] = &[
    (1, "https://www.weather.gov.hk/m/nowcast/images/rain01.png"),
    (2, "https://www.weather.gov.hk/m/nowcast/images/rain02.png"),
    (3, "https://www.weather.gov.hk/m/nowcast/images/rain03.png"),
];

/// Looks up the rain icon for a peak intensity weight.
pub fn rain_icon_url(max_weight: i32) -> Option<&'static str> {
    RAIN_ICON_URLS
        .iter()
        .find(|(weight, _)| *weight == max_weight)
        .map(|(_, url)| *url)
}

// ---------------------------------------------------------------------------
// Outbound relay
// ---------------------------------------------------------------------------

/// IFTTT Maker webhook base. The event and key are appended as
/// `/trigger/{event}/with/key/{key}`.
pub const IFTTT_MAKER_BASE_URL: &str = "https://maker.ifttt.com";

pub const EVENT_CURRENT_WEATHER: &str = "current_weather";
pub const EVENT_RAIN_FORECAST: &str = "rain_forcast";

/// IFTTT webhook keys are always this long; anything else is rejected
/// before a check runs.
pub const IFTTT_KEY_LEN: usize = 43;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feeds_are_hko_rss() {
        let feeds = FeedEndpoints::default();
        for url in [&feeds.en, &feeds.uc, &feeds.td, &feeds.nine_day] {
            assert!(
                url.starts_with("http://rss.weather.gov.hk/rss/") && url.ends_with(".xml"),
                "unexpected feed URL {}",
                url
            );
        }
    }

    #[test]
    fn test_rain_icons_cover_only_wet_levels() {
        assert_eq!(rain_icon_url(0), None);
        assert_eq!(
            rain_icon_url(2),
            Some("https://www.weather.gov.hk/m/nowcast/images/rain02.png")
        );
        assert!(rain_icon_url(3).is_some());
    }

    #[test]
    fn test_nine_day_key_deserializes_from_toml() {
        let feeds: FeedEndpoints = toml::from_str(
            r#"
            en = "file:///tmp/en.xml"
            "9d" = "file:///tmp/9d.xml"
            "#,
        )
        .expect("partial feed table should deserialize");
        assert_eq!(feeds.en, "file:///tmp/en.xml");
        assert_eq!(feeds.nine_day, "file:///tmp/9d.xml");
        assert_eq!(feeds.uc, CURRENT_WEATHER_UC, "unset keys keep their defaults");
    }
}
