/// Integration tests for the current weather record builder
///
/// Feeds are served from saved HKO bulletins under tests/fixtures/, keyed by
/// the URL the builder asks for, so these tests never touch the network.
///
/// Run with: cargo test --test current_weather

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use hkweather_service::endpoints::FeedEndpoints;
use hkweather_service::ingest::current_weather::WeatherChecker;
use hkweather_service::ingest::hko_rss::DocumentSource;
use hkweather_service::model::FeedError;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const DAYS_DESCRIPTION: &str = "天氣概況：預料一道冷鋒在華中形成，並於明晚橫過華南沿岸。與其相關的強烈東北季候風會在未來兩三日為華南帶來清涼的天氣。而季候風將在本週中後期緩和，廣東沿岸氣溫逐漸回升。此外，熱帶氣旋海鷗會在未來兩三日移向呂宋一帶並橫過南海中部。";

const SHORT_SUMMARY: &str = "大致天晴。早上最低氣溫約22度，日間乾燥，最高氣溫約28度。明晚顯著轉涼，氣溫下降至約19度。吹微風，明日轉吹和緩北風，稍後風勢逐漸增強。";

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

/// Serves fixture files by URL. Unknown URLs behave like a 404.
struct FixtureSource {
    documents: HashMap<String, String>,
}

impl FixtureSource {
    fn new(files: &[(&str, &str)]) -> Self {
        let documents = files
            .iter()
            .map(|(url, file)| (url.to_string(), fixture(file)))
            .collect();
        Self { documents }
    }

    /// The four calm-day bulletins at their live URLs.
    fn calm_day() -> Self {
        let endpoints = FeedEndpoints::default();
        Self::new(&[
            (endpoints.en.as_str(), "CurrentWeather.xml"),
            (endpoints.uc.as_str(), "CurrentWeather_uc.xml"),
            (endpoints.nine_day.as_str(), "SeveralDaysWeatherForecast_uc.xml"),
            (endpoints.td.as_str(), "LocalWeatherForecast_uc.xml"),
        ])
    }

    fn replace(mut self, url: &str, file: &str) -> Self {
        self.documents.insert(url.to_string(), fixture(file));
        self
    }

    fn remove(mut self, url: &str) -> Self {
        self.documents.remove(url);
        self
    }
}

impl DocumentSource for FixtureSource {
    fn fetch(&self, url: &str) -> Result<String, FeedError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FeedError::Status { url: url.to_string(), status: 404 })
    }
}

fn checker(source: &FixtureSource) -> WeatherChecker<'_> {
    WeatherChecker::new(FeedEndpoints::default(), source, chrono_tz::Asia::Hong_Kong)
}

// ---------------------------------------------------------------------------
// Full record
// ---------------------------------------------------------------------------

#[test]
fn test_calm_day_record_fields() {
    let source = FixtureSource::calm_day();
    let record = checker(&source).current_weather().expect("fixtures should build a record");

    assert_eq!(record.author, "hkowm@hko.gov.hk");
    assert_eq!(record.publication_date_text, "Sun, 17 Nov 2019 09:02:00 GMT");
    assert_eq!(record.weather_img_url, "http://rss.weather.gov.hk/img/pic50.png");
    assert_eq!(record.weather_img_number, "50");
    assert_eq!(record.temperature, "25");
    assert_eq!(record.relative_humidity, "74");
    assert_eq!(record.uv_index, "0");
    assert_eq!(record.uv_level, "low");
    assert!(!record.rainfall_exist);
    assert_eq!(record.prediction, "");
    assert_eq!(record.warning, "");
    assert_eq!(record.days_description, DAYS_DESCRIPTION);
    assert_eq!(record.short_summary_msg, SHORT_SUMMARY);
}

#[test]
fn test_calm_day_long_message() {
    let source = FixtureSource::calm_day();
    let record = checker(&source).current_weather().expect("fixtures should build a record");

    let expected = format!(
        "\n氣溫: 25 度\n相對濕度: 百分之 74\n曝曬級數: low\n紫外線指數: 0\n{}\n本日預測: {}\n報告時間: 2019-11-17 17:02:00\n",
        DAYS_DESCRIPTION, SHORT_SUMMARY
    );
    assert_eq!(record.long_summary_msg, expected);
}

#[test]
fn test_publication_date_is_parsed() {
    let source = FixtureSource::calm_day();
    let record = checker(&source).current_weather().unwrap();

    let expected = chrono::DateTime::parse_from_rfc3339("2019-11-17T09:02:00Z").unwrap();
    assert_eq!(record.publication_date, expected);
}

// ---------------------------------------------------------------------------
// Optional blocks
// ---------------------------------------------------------------------------

#[test]
fn test_regional_rainfall_sets_flag() {
    let endpoints = FeedEndpoints::default();
    let source = FixtureSource::calm_day().replace(&endpoints.en, "CurrentWeather_rain.xml");
    let record = checker(&source).current_weather().unwrap();

    assert!(record.rainfall_exist);
    assert_eq!(record.temperature, "25");
}

#[test]
fn test_warning_and_prediction_appear_in_message() {
    let endpoints = FeedEndpoints::default();
    let source = FixtureSource::calm_day().replace(&endpoints.uc, "CurrentWeather_uc_warning.xml");
    let record = checker(&source).current_weather().unwrap();

    assert_eq!(record.warning, "強烈季候風信號現正生效。");
    assert_eq!(record.prediction, "預 料 本 港 今 晚 有 一 兩 陣 驟 雨 。");

    let expected_tail = format!(
        "紫外線指數: 0\n強烈季候風信號現正生效。\n預 料 本 港 今 晚 有 一 兩 陣 驟 雨 。\n{}\n本日預測: ",
        DAYS_DESCRIPTION
    );
    assert!(
        record.long_summary_msg.contains(&expected_tail),
        "warning and prediction should sit between UV and outlook: {:?}",
        record.long_summary_msg
    );
}

#[test]
fn test_report_time_uses_configured_timezone() {
    let source = FixtureSource::calm_day();
    let record = WeatherChecker::new(FeedEndpoints::default(), &source, chrono_tz::UTC)
        .current_weather()
        .unwrap();

    assert!(record.long_summary_msg.ends_with("報告時間: 2019-11-17 09:02:00\n"));
}

// ---------------------------------------------------------------------------
// Failures abort the build
// ---------------------------------------------------------------------------

#[test]
fn test_unreachable_feed_aborts() {
    let endpoints = FeedEndpoints::default();
    let source = FixtureSource::calm_day().remove(&endpoints.td);
    let err = checker(&source).current_weather().expect_err("missing td feed must fail");

    assert!(
        matches!(err, FeedError::Status { ref url, status: 404 } if *url == endpoints.td),
        "got {:?}",
        err
    );
}

#[test]
fn test_feed_without_payload_aborts() {
    let endpoints = FeedEndpoints::default();
    let mut source = FixtureSource::calm_day();
    source.documents.insert(
        endpoints.nine_day.clone(),
        "<rss><channel><item><description>empty</description></item></channel></rss>".to_string(),
    );
    let err = checker(&source).current_weather().expect_err("9d without CDATA must fail");

    assert!(matches!(err, FeedError::MissingPayload(_)), "got {:?}", err);
}

#[test]
fn test_invalid_pub_date_aborts() {
    let endpoints = FeedEndpoints::default();
    let broken = fixture("CurrentWeather.xml")
        .replace("Sun, 17 Nov 2019 09:02:00 GMT", "yesterday afternoon");
    let mut source = FixtureSource::calm_day();
    source.documents.insert(endpoints.en.clone(), broken);

    let err = checker(&source).current_weather().expect_err("bad pubDate must fail");
    assert!(
        matches!(err, FeedError::InvalidDate { ref text, .. } if text == "yesterday afternoon"),
        "got {:?}",
        err
    );
}
