/// Rain nowcast analysis.
///
/// Submodules:
/// - `rain_levels`: maps nowcast image names onto the `RainLevel` scale.
/// - `rain_trend`: finds rain onset, peak and cessation in a sample.

pub mod rain_levels;
pub mod rain_trend;
