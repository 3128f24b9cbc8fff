//! Confidence tier classification

use compest_common::models::Confidence;

/// Minimum comps for a high-confidence estimate
pub const HIGH_MIN_COMPS: usize = 10;
/// Maximum IQR / median for a high-confidence estimate (exclusive)
pub const HIGH_MAX_SPREAD: f64 = 0.18;
/// Minimum comps for a medium-confidence estimate
pub const MEDIUM_MIN_COMPS: usize = 6;
/// Maximum IQR / median for a medium-confidence estimate (exclusive)
pub const MEDIUM_MAX_SPREAD: f64 = 0.28;

/// Map sample size and relative spread to a tier
///
/// A non-positive median always yields [`Confidence::Low`].
pub fn classify(comp_count: usize, median: f64, iqr: f64) -> Confidence {
    if median.is_nan() || median <= 0.0 {
        return Confidence::Low;
    }
    let spread = iqr / median;

    if comp_count >= HIGH_MIN_COMPS && spread < HIGH_MAX_SPREAD {
        Confidence::High
    } else if comp_count >= MEDIUM_MIN_COMPS && spread < MEDIUM_MAX_SPREAD {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
