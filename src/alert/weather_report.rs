//! Long-form current weather message.
//!
//! Lines are emitted in a fixed order. Optional blocks (UV, warning,
//! prediction, multi-day outlook) are dropped entirely when their source
//! field is empty, so an absent field never leaves a blank line behind.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;

/// The extracted fields a weather message is built from.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherMessage<'a> {
    pub temperature: &'a str,
    pub relative_humidity: &'a str,
    pub uv_index: &'a str,
    pub uv_level: &'a str,
    pub warning: &'a str,
    pub prediction: &'a str,
    pub days_description: &'a str,
    pub summary: &'a str,
}

/// Renders the message. `published` is shown in `local_tz` as
/// `YYYY-MM-DD HH:MM:SS`.
pub fn format_weather_message(
    msg: &WeatherMessage<'_>,
    published: DateTime<FixedOffset>,
    local_tz: Tz,
) -> String {
    let mut out = String::new();

    let _ = write!(out, "\n氣溫: {} 度", msg.temperature);
    let _ = write!(out, "\n相對濕度: 百分之 {}", msg.relative_humidity);

    if !msg.uv_index.is_empty() {
        let _ = write!(out, "\n曝曬級數: {}", msg.uv_level);
        let _ = write!(out, "\n紫外線指數: {}", msg.uv_index);
    }

    for optional in [msg.warning, msg.prediction, msg.days_description] {
        if !optional.is_empty() {
            out.push('\n');
            out.push_str(optional);
        }
    }

    let _ = write!(out, "\n本日預測: {}", msg.summary);
    let _ = write!(
        out,
        "\n報告時間: {}\n",
        published.with_timezone(&local_tz).format("%Y-%m-%d %H:%M:%S")
    );

    out
}
