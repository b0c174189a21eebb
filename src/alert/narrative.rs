//! Rain nowcast wording.
//!
//! Pure string assembly; all inference happens in `analysis::rain_trend`.

use std::fmt::Write as _;

/// Short message when no step in the window shows rain.
pub const NO_RAIN_MESSAGE: &str = "兩個鐘內無雨";

const HEAVY_RAIN_PREFIX: &str = "會落大雨!";
const UMBRELLA: &str = "記得帶遮，";
const RAIN_STARTS: &str = "開始落雨。";
const RAIN_PEAKS: &str = "落到最大。";
const RAIN_STOPS: &str = "停雨。";

/// Elapsed-time phrases for the two-hour window, in half-hour buckets.
pub const TIME_BUCKETS: [&str; 4] = ["半個鐘內", "一個鐘內", "個半鐘內", "兩個鐘內"];

/// Phrase for step `index` of a `len`-step window.
///
/// The window always spans two hours, so the step is scaled onto the four
/// half-hour buckets: with 4 steps each step is its own bucket, with 12
/// ten-minute steps every three steps share one.
pub fn time_bucket_label(index: usize, len: usize) -> &'static str {
    let last = TIME_BUCKETS.len() - 1;
    let bucket = (index * TIME_BUCKETS.len() / len.max(1)).min(last);
    TIME_BUCKETS[bucket]
}

/// Notification line for a wet window.
///
/// `stop` is only mentioned when it is a real, non-zero step.
pub fn short_summary(
    rain_start: usize,
    heavy_start: Option<usize>,
    stop: Option<usize>,
    len: usize,
) -> String {
    let mut out = String::new();

    if heavy_start.is_some() {
        out.push_str(HEAVY_RAIN_PREFIX);
    }
    out.push_str(UMBRELLA);
    let _ = write!(out, "{}{}", time_bucket_label(rain_start, len), RAIN_STARTS);

    if let Some(peak) = heavy_start {
        let _ = write!(out, "{}{}", time_bucket_label(peak, len), RAIN_PEAKS);
    }
    if let Some(stop) = stop.filter(|&s| s > 0) {
        let _ = write!(out, "{}{}", time_bucket_label(stop, len), RAIN_STOPS);
    }

    out
}

/// Multi-line report: header, one line per nowcast step, then the short
/// summary.
pub fn long_summary<S: AsRef<str>>(report_time: &str, step_labels: &[S], short: &str) -> String {
    let mut out = format!("\n{report_time}降雨預報:");
    for label in step_labels {
        out.push('\n');
        out.push_str(label.as_ref());
    }
    out.push('\n');
    out.push_str(short);
    out
}
