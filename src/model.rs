/// Core data types for the Hong Kong weather bot.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O: only value types, the rain-level scale, and the
/// error enums each pipeline stage can surface.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Current weather
// ---------------------------------------------------------------------------

/// One snapshot of current conditions assembled from the four HKO feeds.
///
/// Every extracted text field is an empty string when its pattern did not
/// match. Composition code checks `is_empty()`, never `Option`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub author: String,
    pub publication_date: DateTime<FixedOffset>,
    pub publication_date_text: String, // RFC 2822, e.g. "Sun, 17 Nov 2019 09:02:00 GMT"
    pub weather_img_url: String,
    pub weather_img_number: String, // digits of ".../img/pic50.png"
    pub temperature: String,        // degrees Celsius
    pub relative_humidity: String,  // per cent
    pub uv_index: String,
    pub uv_level: String,
    pub rainfall_exist: bool,
    pub prediction: String,
    pub warning: String,
    pub days_description: String,
    pub short_summary_msg: String,
    pub long_summary_msg: String,
}

// ---------------------------------------------------------------------------
// Rain nowcast
// ---------------------------------------------------------------------------

/// One image scraped from the nowcast page by the external renderer.
///
/// The renderer emits `null` for images that had not loaded yet, so both
/// fields are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RainImage {
    pub src: Option<String>,
    pub alt: Option<String>,
}

impl RainImage {
    /// Alt text with a missing value rendered as an empty string.
    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }
}

/// Discrete rain intensity for one nowcast time step.
///
/// The two sentinel variants keep the numeric weights the nowcast images
/// have always been scored with, so that a sample dominated by unusable
/// images sums to a negative total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RainLevel {
    /// Image label could not be read at all, or was the `none` image.
    NoSignal,
    /// Image label was readable but is not one the classifier knows.
    Unrecognized,
    Dry,
    Light,
    Moderate,
    Heavy,
}

impl RainLevel {
    /// The numeric score used for trend scanning and the inaccuracy sum.
    pub fn weight(self) -> i32 {
        match self {
            RainLevel::NoSignal => -100,
            RainLevel::Unrecognized => -1000,
            RainLevel::Dry => 0,
            RainLevel::Light => 1,
            RainLevel::Moderate => 2,
            RainLevel::Heavy => 3,
        }
    }
}

/// Two-hour rain outlook derived from a nowcast sample.
///
/// `has_result == false` means the renderer produced nothing usable; every
/// other field then holds its empty default and must not be read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RainForecast {
    pub has_result: bool,
    pub report_time: String, // "HH:MM"
    pub rain_nearest: Option<usize>,
    pub no_rain: bool,
    pub inaccurate_result: bool,
    pub stop_nearest: Option<usize>,
    pub big_rain: bool,
    pub big_rain_nearest: Option<usize>,
    pub short_summary_msg: String,
    pub long_summary_msg: String,
    pub rain_img_url: String,
}

impl RainForecast {
    /// A forecast for a failed or empty nowcast.
    pub fn no_result() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a weather-record build.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },
    /// Non-2xx HTTP response from the feed host.
    #[error("HTTP error {status} from {url}")]
    Status { url: String, status: u16 },
    /// The RSS envelope is not well-formed XML.
    #[error("XML error in {url}: {message}")]
    Xml { url: String, message: String },
    /// The feed item carries no embedded CDATA payload.
    #[error("No embedded payload in {0}")]
    MissingPayload(String),
    /// `pubDate` was absent or not an RFC 2822 date.
    #[error("Invalid publication date {text:?}: {message}")]
    InvalidDate { text: String, message: String },
}

/// Errors from the external nowcast renderer.
#[derive(Debug, Error)]
pub enum NowcastError {
    /// The renderer process could not be started.
    #[error("failed to spawn renderer: {0}")]
    Spawn(#[from] std::io::Error),
    /// The renderer ran but exited unsuccessfully.
    #[error("renderer exited with {0}")]
    ExitStatus(String),
    /// The renderer output was not the expected JSON array.
    #[error("malformed renderer output: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors from the outbound IFTTT webhook call.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
