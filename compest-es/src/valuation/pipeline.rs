//! Valuation orchestration and result assembly

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use compest_common::config::SearchConfig;
use compest_common::models::{AddressSpec, Comp, EstimateResult, PropertySpec};
use compest_common::{time, uuid_utils};
use tracing::{debug, error, info};

use super::adjustment::adjusted_price;
use super::confidence::classify;
use super::percentile::quartiles;
use super::selection::{filter_by_type, select_top, ScoredComp, MAX_SELECTED_COMPS};
use super::similarity::score;
use super::EstimateError;
use crate::sources::{CompQuery, CompSource};

/// Inputs to one valuation besides the subject itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationParams {
    pub radius_km: f64,
    pub days: u32,
    /// Date recency is measured against
    pub reference_date: NaiveDate,
}

impl ValuationParams {
    pub fn new(search: SearchConfig, reference_date: NaiveDate) -> Self {
        Self {
            radius_km: search.radius_km,
            days: search.days,
            reference_date,
        }
    }
}

/// Run the full pipeline: validate, retrieve, value
///
/// Assigns a fresh identifier and creation timestamp to the result.
pub async fn estimate(
    source: &dyn CompSource,
    address: &AddressSpec,
    property: &PropertySpec,
    params: &ValuationParams,
) -> Result<EstimateResult, EstimateError> {
    property.validate()?;

    let query = CompQuery {
        radius_km: params.radius_km,
        days: params.days,
        as_of: params.reference_date,
    };
    let comps = source
        .get_comps(address, property, &query)
        .await
        .map_err(EstimateError::Retrieval)?;
    debug!(provider = source.name(), retrieved = comps.len(), "Comps retrieved");

    value_comps(
        property,
        comps,
        params.reference_date,
        uuid_utils::new_estimate_id(),
        time::now(),
    )
}

/// Value a subject from already-retrieved comps
///
/// Pure: the same inputs always yield the same result.
pub fn value_comps(
    property: &PropertySpec,
    comps: Vec<Comp>,
    reference_date: NaiveDate,
    id: String,
    created_at: DateTime<Utc>,
) -> Result<EstimateResult, EstimateError> {
    let comps = filter_by_type(comps, property.property_type);
    if comps.is_empty() {
        info!(property_type = %property.property_type, "No comps of matching type");
        return Err(EstimateError::NoComparablesFound);
    }

    let scored: Vec<ScoredComp> = comps
        .into_iter()
        .map(|comp| ScoredComp {
            adjusted_price: adjusted_price(property, &comp),
            score: score(property, &comp, reference_date).composite(),
            comp,
        })
        .collect();
    let selected = select_top(scored, MAX_SELECTED_COMPS);

    let prices: Vec<f64> = selected.iter().map(|s| s.adjusted_price).collect();
    let weights: Vec<f64> = selected.iter().map(|s| s.score).collect();
    let q = quartiles(&prices, &weights).ok_or_else(|| {
        error!(selected = selected.len(), "Percentile requested over an empty comp set");
        EstimateError::InvariantViolation("weighted percentile over empty comp set".to_string())
    })?;

    let confidence = classify(selected.len(), q.median, q.iqr());
    let comp_count = selected.len();
    let comps = selected.into_iter().map(ScoredComp::into_adjusted).collect();

    let result = EstimateResult::new(
        id,
        q.median,
        q.low,
        q.high,
        confidence,
        comps,
        BTreeMap::new(),
        created_at,
    )
    .map_err(|e| {
        error!(error = %e, "Assembled estimate violates its range invariant");
        EstimateError::InvariantViolation(e.to_string())
    })?;

    info!(
        estimate_id = %result.id,
        comps = comp_count,
        point_estimate = result.point_estimate,
        confidence = %result.confidence,
        "Estimate computed"
    );
    Ok(result)
}
