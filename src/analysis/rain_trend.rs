//! Two-hour rain trend inference.
//!
//! Scans a time-ordered nowcast sample for when rain starts, whether and
//! when it turns heavy, and when it first stops again, then hands the
//! result to `alert::narrative` for wording.

use crate::alert::narrative::{self, NO_RAIN_MESSAGE};
use crate::analysis::rain_levels::classify_images;
use crate::endpoints::rain_icon_url;
use crate::ingest::nowcast_renderer::RainImageSource;
use crate::logging::{self, DataSource};
use crate::model::{RainForecast, RainLevel};

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

/// First index whose weight is strictly above `threshold`.
pub fn first_index_above(levels: &[RainLevel], threshold: i32) -> Option<usize> {
    levels.iter().position(|l| l.weight() > threshold)
}

/// First index at or after `start` whose weight equals `value`.
pub fn first_index_at_value(levels: &[RainLevel], value: i32, start: usize) -> Option<usize> {
    levels
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, l)| l.weight() == value)
        .map(|(i, _)| i)
}

/// First step showing the heaviest level. Exact match on `Heavy`; there is
/// nothing above it to threshold against.
pub fn first_heavy_index(levels: &[RainLevel]) -> Option<usize> {
    levels.iter().position(|&l| l == RainLevel::Heavy)
}

/// True when unusable images outweigh the real readings.
pub fn is_inaccurate(levels: &[RainLevel]) -> bool {
    levels.iter().map(|l| l.weight()).sum::<i32>() < 0
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Builds a forecast from classified levels and the per-step labels shown
/// on the page (the first label starts with the `HH:MM` report time).
///
/// An empty sample has no result.
pub fn analyze<S: AsRef<str>>(levels: &[RainLevel], step_labels: &[S]) -> RainForecast {
    if levels.is_empty() {
        return RainForecast::no_result();
    }

    let report_time: String = step_labels
        .first()
        .map(|l| l.as_ref().chars().take(5).collect())
        .unwrap_or_default();

    let rain_nearest = first_index_above(levels, RainLevel::Dry.weight());
    let big_rain_nearest = first_heavy_index(levels);

    let mut forecast = RainForecast {
        has_result: true,
        report_time,
        rain_nearest,
        no_rain: rain_nearest.is_none(),
        inaccurate_result: is_inaccurate(levels),
        big_rain: big_rain_nearest.is_some(),
        big_rain_nearest,
        ..RainForecast::default()
    };

    match rain_nearest {
        None => {
            forecast.short_summary_msg = NO_RAIN_MESSAGE.to_string();
        }
        Some(start) => {
            forecast.stop_nearest = first_index_at_value(levels, RainLevel::Dry.weight(), start);

            let peak = levels.iter().map(|l| l.weight()).max().unwrap_or(0);
            forecast.rain_img_url = rain_icon_url(peak).unwrap_or_default().to_string();

            forecast.short_summary_msg = narrative::short_summary(
                start,
                big_rain_nearest,
                forecast.stop_nearest,
                levels.len(),
            );
            forecast.long_summary_msg = narrative::long_summary(
                &forecast.report_time,
                step_labels,
                &forecast.short_summary_msg,
            );
        }
    }

    forecast
}

/// Runs the renderer once and analyzes its output.
///
/// A renderer failure is not propagated: it is logged and becomes a
/// no-result forecast, the same as an empty page.
pub fn forecast_rain(source: &dyn RainImageSource, url: &str, retry: u32) -> RainForecast {
    let images = match source.fetch_images(url, retry) {
        Ok(images) => images,
        Err(e) => {
            logging::log_nowcast_failure(url, "render nowcast page", &e);
            return RainForecast::no_result();
        }
    };

    let levels = classify_images(&images);
    let labels: Vec<&str> = images.iter().map(|img| img.alt_text()).collect();
    let forecast = analyze(&levels, &labels);

    if forecast.inaccurate_result {
        logging::warn(
            DataSource::Nowcast,
            Some(url),
            &format!("nowcast sample dominated by unreadable images: {:?}", levels),
        );
    }

    forecast
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
