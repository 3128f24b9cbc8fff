//! Comp similarity scoring
//!
//! Three exponential-decay components, each in (0, 1], blended with fixed
//! weights into a composite score used both for ranking and as the weight in
//! the percentile estimate.

use chrono::NaiveDate;
use compest_common::models::{Comp, PropertySpec};
use compest_common::time::days_between;

/// Distance (km) at which proximity decays to 1/e
pub const PROXIMITY_SCALE_KM: f64 = 1.5;

/// Floor-area difference (sqft) at which size similarity decays to 1/e
pub const SIZE_SCALE_SQFT: f64 = 600.0;

/// Age (days) at which recency decays to 1/e
pub const RECENCY_SCALE_DAYS: f64 = 60.0;

pub const PROXIMITY_WEIGHT: f64 = 0.5;
pub const SIZE_WEIGHT: f64 = 0.3;
pub const RECENCY_WEIGHT: f64 = 0.2;

/// Per-component breakdown of a comp's similarity to the subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    pub proximity: f64,
    pub size: f64,
    pub recency: f64,
}

impl SimilarityScore {
    /// `0.5 × proximity + 0.3 × size + 0.2 × recency`
    pub fn composite(&self) -> f64 {
        PROXIMITY_WEIGHT * self.proximity + SIZE_WEIGHT * self.size + RECENCY_WEIGHT * self.recency
    }
}

/// `exp(−distance_km / 1.5)`
pub fn proximity(distance_km: f64) -> f64 {
    (-distance_km.max(0.0) / PROXIMITY_SCALE_KM).exp()
}

/// `exp(−|subject_sqft − comp_sqft| / 600)`
pub fn size_similarity(subject_sqft: u32, comp_sqft: u32) -> f64 {
    let diff = (subject_sqft as f64 - comp_sqft as f64).abs();
    (-diff / SIZE_SCALE_SQFT).exp()
}

/// `exp(−days_since / 60)`. Comps dated after the reference date count as age 0.
pub fn recency(comp_date: NaiveDate, reference_date: NaiveDate) -> f64 {
    let days = days_between(comp_date, reference_date) as f64;
    (-days / RECENCY_SCALE_DAYS).exp()
}

/// Score a comp against the subject as of `reference_date`
pub fn score(subject: &PropertySpec, comp: &Comp, reference_date: NaiveDate) -> SimilarityScore {
    SimilarityScore {
        proximity: proximity(comp.distance_km),
        size: size_similarity(subject.sqft, comp.sqft),
        recency: recency(comp.closed_or_listed_date, reference_date),
    }
}
