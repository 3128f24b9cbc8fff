//! Price adjustment for size and condition differences
//!
//! Both factors are multiplicative and monotonic: the adjusted price rises
//! with the subject's floor area (comp held fixed) and with its condition
//! grade.

use compest_common::models::{Comp, PropertySpec};

/// Denominator floor for the size ratio, equal to the minimum accepted sqft
pub const SIZE_FLOOR_SQFT: f64 = 300.0;

/// Elasticity of price with respect to floor area
pub const SIZE_EXPONENT: f64 = 0.25;

/// Price change per condition grade
pub const CONDITION_STEP: f64 = 0.02;

/// Condition grade that leaves the price untouched
pub const NEUTRAL_CONDITION: f64 = 3.0;

/// `(subject_sqft / max(comp_sqft, 300)) ^ 0.25`
pub fn size_factor(subject_sqft: u32, comp_sqft: u32) -> f64 {
    let denominator = (comp_sqft as f64).max(SIZE_FLOOR_SQFT);
    (subject_sqft as f64 / denominator).powf(SIZE_EXPONENT)
}

/// `1 + 0.02 × (condition − 3)`
pub fn condition_factor(subject_condition: u8) -> f64 {
    1.0 + CONDITION_STEP * (subject_condition as f64 - NEUTRAL_CONDITION)
}

/// Comp price normalized to the subject's size and condition
pub fn adjusted_price(subject: &PropertySpec, comp: &Comp) -> f64 {
    comp.price * size_factor(subject.sqft, comp.sqft) * condition_factor(subject.condition)
}
