//! Nowcast image classification.
//!
//! Each nowcast time step is shown as one of a handful of images
//! (`images/noRain.png`, `images/rain01.png`, ...). The image name is the
//! only machine-readable signal on the page, so it is mapped straight onto
//! the `RainLevel` scale.

use crate::extract::{NOWCAST_IMAGE_NAME, extract};
use crate::model::{RainImage, RainLevel};

/// Maps one image path to a level. Never fails.
///
/// - no `images/<name>.png` in the label → `NoSignal`
/// - `none` → `NoSignal`
/// - a name outside the known set → `Unrecognized`
pub fn classify_label(label: &str) -> RainLevel {
    let name = extract(&NOWCAST_IMAGE_NAME, label);
    if name.is_empty() {
        return RainLevel::NoSignal;
    }

    match name.as_str() {
        "noRain" => RainLevel::Dry,
        "rain01" => RainLevel::Light,
        "rain02" => RainLevel::Moderate,
        "rain03" => RainLevel::Heavy,
        "none" => RainLevel::NoSignal,
        _ => RainLevel::Unrecognized,
    }
}

/// Classifies every label, preserving order and length.
pub fn classify<S: AsRef<str>>(labels: &[S]) -> Vec<RainLevel> {
    labels.iter().map(|l| classify_label(l.as_ref())).collect()
}

/// Classifies renderer output. Images whose `src` never loaded count as
/// `NoSignal`.
pub fn classify_images(images: &[RainImage]) -> Vec<RainLevel> {
    images
        .iter()
        .map(|img| img.src.as_deref().map_or(RainLevel::NoSignal, classify_label))
        .collect()
}
