//! Labeled pattern extraction over feed text.
//!
//! Absence is not an error here: a pattern that does not match yields an
//! empty string, and every caller tests for presence with `is_empty()`.

use std::sync::LazyLock;

use regex::Regex;

/// Returns the first capture group of the first match, or `""`.
pub fn extract(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Removes every whitespace character. The Chinese feeds letter-space
/// their text ("天 氣 概 況"), so collapsed output reads naturally.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect()
}

// ---------------------------------------------------------------------------
// HKO feed patterns
// ---------------------------------------------------------------------------

fn pattern(re: &str) -> Regex {
    // Patterns below are literals covered by tests.
    Regex::new(re).unwrap_or_else(|e| panic!("invalid built-in pattern {re:?}: {e}"))
}

pub static ICON_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"http://rss\.weather\.gov\.hk/img/pic(\d+)\.png"));

pub static TEMPERATURE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"Air temperature.* (\d+).*degrees Celsius"));

pub static RELATIVE_HUMIDITY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"Relative Humidity.* (\d+).*per cent"));

pub static UV_INDEX: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"the mean UV Index recorded at King's Park.* (\d+)"));

pub static UV_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"Intensity of UV radiation : (\S*) "));

pub static RAINFALL_TABLE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(.*the rainfall recorded in various regions were.*)"));

pub static PREDICTION: LazyLock<Regex> = LazyLock::new(|| pattern(r"(預 料 .*)"));

pub static DAYS_OUTLOOK: LazyLock<Regex> = LazyLock::new(|| pattern(r"(天 氣 概 況 ：.*)  "));

pub static TODAY_FORECAST: LazyLock<Regex> = LazyLock::new(|| pattern(r"天氣預測:(.*)"));

/// Nowcast image path, e.g. `images/rain02.png` → `rain02`.
pub static NOWCAST_IMAGE_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"images/(.*)\.png"));
