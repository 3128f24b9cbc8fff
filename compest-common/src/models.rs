//! Valuation domain models
//!
//! Subject property, comparable sales and the estimate result shared by the
//! estimate service, its comp sources and its result stores. All types are
//! JSON-serializable with the field names used on the wire.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest floor area accepted for a subject or a comp
pub const MIN_SQFT: u32 = 300;

/// Lowest condition grade
pub const MIN_CONDITION: u8 = 1;

/// Highest condition grade
pub const MAX_CONDITION: u8 = 5;

/// Field constraint violation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("baths must be a non-negative multiple of 0.5, got {0}")]
    BathsNotHalfStep(f64),

    #[error("sqft must be at least 300, got {0}")]
    SqftTooSmall(u32),

    #[error("condition must be between 1 and 5, got {0}")]
    ConditionOutOfRange(u8),

    #[error("{field} must be a finite value >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("point_estimate {point} must lie within [{low}, {high}]")]
    RangeInvariant { low: f64, point: f64, high: f64 },
}

/// Property type shared by subject and comps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    Condo,
    SingleFamily,
    Townhome,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Condo => "condo",
            PropertyType::SingleFamily => "single_family",
            PropertyType::Townhome => "townhome",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the subject is valued as a rental or a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tenure {
    Rent,
    Sale,
}

impl Tenure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tenure::Rent => "rent",
            Tenure::Sale => "sale",
        }
    }
}

/// Qualitative reliability bucket of an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject address. Opaque; only used to locate or seed comps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSpec {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// The property being valued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub beds: u32,
    pub baths: f64,
    pub sqft: u32,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub condition: u8,
    pub tenure: Tenure,
}

impl PropertySpec {
    /// Check field constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_baths(self.baths)?;
        validate_sqft(self.sqft)?;
        if !(MIN_CONDITION..=MAX_CONDITION).contains(&self.condition) {
            return Err(ValidationError::ConditionOutOfRange(self.condition));
        }
        Ok(())
    }
}

/// A comparable sale or listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comp {
    pub id: String,
    pub address: String,
    pub distance_km: f64,
    pub beds: u32,
    pub baths: f64,
    pub sqft: u32,
    pub price: f64,
    pub closed_or_listed_date: NaiveDate,
    pub property_type: PropertyType,
    pub source: String,
}

impl Comp {
    /// Check field constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("distance_km", self.distance_km)?;
        validate_baths(self.baths)?;
        validate_sqft(self.sqft)?;
        validate_non_negative("price", self.price)?;
        Ok(())
    }
}

/// A comp annotated with its adjusted price. The original comp is kept intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedComp {
    #[serde(flatten)]
    pub comp: Comp,
    pub adjusted_price: f64,
}

/// POST /estimate request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub address: AddressSpec,
    pub property: PropertySpec,
}

impl EstimateRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.property.validate()
    }
}

/// Valuation output
///
/// `range_low <= point_estimate <= range_high` always holds: [`EstimateResult::new`]
/// refuses to build a result that breaks it, and deserialization goes through
/// the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EstimateResultFields")]
pub struct EstimateResult {
    pub id: String,
    pub point_estimate: f64,
    pub range_low: f64,
    pub range_high: f64,
    pub confidence: Confidence,
    pub comps: Vec<AdjustedComp>,
    pub adjustments: BTreeMap<String, f64>,
    pub created_at: DateTime<Utc>,
}

/// Unchecked field set an [`EstimateResult`] is deserialized through
#[derive(Debug, Deserialize)]
struct EstimateResultFields {
    id: String,
    point_estimate: f64,
    range_low: f64,
    range_high: f64,
    confidence: Confidence,
    comps: Vec<AdjustedComp>,
    #[serde(default)]
    adjustments: BTreeMap<String, f64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<EstimateResultFields> for EstimateResult {
    type Error = ValidationError;

    fn try_from(f: EstimateResultFields) -> Result<Self, Self::Error> {
        check_range(f.range_low, f.point_estimate, f.range_high)?;
        Ok(EstimateResult {
            id: f.id,
            point_estimate: f.point_estimate,
            range_low: f.range_low,
            range_high: f.range_high,
            confidence: f.confidence,
            comps: f.comps,
            adjustments: f.adjustments,
            created_at: f.created_at,
        })
    }
}

impl EstimateResult {
    /// Build a result, enforcing the range postcondition
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        point_estimate: f64,
        range_low: f64,
        range_high: f64,
        confidence: Confidence,
        comps: Vec<AdjustedComp>,
        adjustments: BTreeMap<String, f64>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        check_range(range_low, point_estimate, range_high)?;
        Ok(Self {
            id,
            point_estimate,
            range_low,
            range_high,
            confidence,
            comps,
            adjustments,
            created_at,
        })
    }
}

fn check_range(low: f64, point: f64, high: f64) -> Result<(), ValidationError> {
    // Written so that NaN in any position fails
    if low <= point && point <= high {
        Ok(())
    } else {
        Err(ValidationError::RangeInvariant { low, point, high })
    }
}

fn validate_baths(baths: f64) -> Result<(), ValidationError> {
    if baths.is_finite() && baths >= 0.0 && (baths * 2.0).fract() == 0.0 {
        Ok(())
    } else {
        Err(ValidationError::BathsNotHalfStep(baths))
    }
}

fn validate_sqft(sqft: u32) -> Result<(), ValidationError> {
    if sqft >= MIN_SQFT {
        Ok(())
    } else {
        Err(ValidationError::SqftTooSmall(sqft))
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative { field, value })
    }
}
