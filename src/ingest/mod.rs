/// Upstream data collection.
///
/// Submodules:
/// - `hko_rss`: fetches an HKO RSS feed and re-parses its embedded payload.
/// - `current_weather`: builds a `WeatherRecord` from the four feeds.
/// - `nowcast_renderer`: runs the external rain nowcast renderer.

pub mod current_weather;
pub mod hko_rss;
pub mod nowcast_renderer;
