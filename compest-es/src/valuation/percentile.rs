//! Weighted percentile estimation
//!
//! Step-function weighted percentile: values are sorted ascending, their
//! weights accumulated and normalized by the total, and the first value whose
//! normalized cumulative weight reaches `p` is returned. No interpolation
//! happens between neighbouring values, so the result is always one of the
//! inputs.
//!
//! # Edge cases
//! - One value: returned for every `p`.
//! - All weights zero (or a non-finite total): weights are treated as uniform
//!   1.0 instead of dividing by zero.
//! - No position reaches `p` (rounding when `p` is close to 1): the largest
//!   value is returned.
//! - Empty input or mismatched lengths: `None`. Callers guarantee at least one
//!   comp, so `None` signals a broken upstream contract.

/// Percentiles used by the estimate
pub const P_LOW: f64 = 0.25;
pub const P_MEDIAN: f64 = 0.5;
pub const P_HIGH: f64 = 0.75;

/// Weighted percentile of `values` at `p ∈ [0, 1]`, weighted by `weights`
pub fn weighted_percentile(values: &[f64], weights: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || values.len() != weights.len() {
        return None;
    }

    let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    let uniform = !(total.is_finite() && total > 0.0);
    let total = if uniform { pairs.len() as f64 } else { total };

    let mut cumulative = 0.0;
    for (value, weight) in &pairs {
        cumulative += if uniform { 1.0 } else { *weight };
        if cumulative / total >= p {
            return Some(*value);
        }
    }

    pairs.last().map(|(value, _)| *value)
}

/// P25, median and P75 of one weighted sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub low: f64,
    pub median: f64,
    pub high: f64,
}

impl Quartiles {
    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.high - self.low
    }
}

/// Compute [`Quartiles`]; `None` under the same conditions as [`weighted_percentile`]
pub fn quartiles(values: &[f64], weights: &[f64]) -> Option<Quartiles> {
    Some(Quartiles {
        low: weighted_percentile(values, weights, P_LOW)?,
        median: weighted_percentile(values, weights, P_MEDIAN)?,
        high: weighted_percentile(values, weights, P_HIGH)?,
    })
}
