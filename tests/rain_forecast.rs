/// Integration tests for the rain nowcast pipeline
///
/// Renderer output captured from the nowcast page is replayed through a
/// canned `RainImageSource`; classification, trend inference, wording and
/// the webhook payload are all exercised without the browser script.
///
/// Run with: cargo test --test rain_forecast

use std::fs;
use std::path::PathBuf;

use hkweather_service::analysis::rain_trend::forecast_rain;
use hkweather_service::checks::rain_values;
use hkweather_service::endpoints::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE, NOWCAST_PAGE_URL};
use hkweather_service::ingest::nowcast_renderer::{
    RainImageSource, build_nowcast_url, parse_renderer_output,
};
use hkweather_service::model::{NowcastError, RainImage};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn renderer_output(name: &str) -> Vec<RainImage> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let bytes = fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    parse_renderer_output(&bytes).expect("fixture is valid renderer output")
}

/// Replays a captured image list, or fails like a crashed renderer.
struct Replay(Option<Vec<RainImage>>);

impl RainImageSource for Replay {
    fn fetch_images(&self, _url: &str, _retry: u32) -> Result<Vec<RainImage>, NowcastError> {
        self.0
            .clone()
            .ok_or_else(|| NowcastError::ExitStatus("exit status: 1".to_string()))
    }
}

fn nowcast_url() -> String {
    build_nowcast_url(NOWCAST_PAGE_URL, DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_wet_window_forecast() {
    let source = Replay(Some(renderer_output("nowcast_wet.json")));
    let forecast = forecast_rain(&source, &nowcast_url(), 5);

    assert!(forecast.has_result);
    assert!(!forecast.no_rain);
    assert!(!forecast.inaccurate_result);
    assert_eq!(forecast.report_time, "17:10");
    assert_eq!(forecast.rain_nearest, Some(1));
    assert!(forecast.big_rain);
    assert_eq!(forecast.big_rain_nearest, Some(2));
    assert_eq!(forecast.stop_nearest, Some(3));
    assert_eq!(
        forecast.rain_img_url,
        "https://www.weather.gov.hk/m/nowcast/images/rain03.png"
    );

    let short = "會落大雨!記得帶遮，一個鐘內開始落雨。個半鐘內落到最大。兩個鐘內停雨。";
    assert_eq!(forecast.short_summary_msg, short);
    assert_eq!(
        forecast.long_summary_msg,
        format!(
            "\n17:10降雨預報:\n17:10 - 17:40 \n17:40 - 18:10 \n18:10 - 18:40 \n18:40 - 19:10 \n{}",
            short
        )
    );
}

#[test]
fn test_wet_window_is_sent_even_when_silenced() {
    let source = Replay(Some(renderer_output("nowcast_wet.json")));
    let forecast = forecast_rain(&source, &nowcast_url(), 5);
    let values = rain_values(&forecast, true).expect("rain is always sent");

    assert_eq!(values.value1, forecast.short_summary_msg);
    assert_eq!(values.value2, forecast.long_summary_msg);
    assert_eq!(values.value3.as_deref(), Some(forecast.rain_img_url.as_str()));
}

#[test]
fn test_unloaded_images_flag_inaccurate_result() {
    let forecast = forecast_rain(
        &Replay(Some(renderer_output("nowcast_unloaded.json"))),
        &nowcast_url(),
        5,
    );

    assert!(forecast.has_result);
    assert!(forecast.no_rain);
    assert!(forecast.inaccurate_result);
    assert_eq!(forecast.rain_nearest, None);
    assert_eq!(forecast.short_summary_msg, "兩個鐘內無雨");
    assert_eq!(forecast.rain_img_url, "");

    // Dry windows are dropped only when silenced.
    assert!(rain_values(&forecast, false).is_some());
    assert!(rain_values(&forecast, true).is_none());
}

#[test]
fn test_renderer_failure_yields_no_result() {
    let forecast = forecast_rain(&Replay(None), &nowcast_url(), 5);

    assert!(!forecast.has_result);
    assert!(rain_values(&forecast, false).is_none());
}

#[test]
fn test_empty_render_yields_no_result() {
    let forecast = forecast_rain(&Replay(Some(Vec::new())), &nowcast_url(), 5);
    assert!(!forecast.has_result);
}
