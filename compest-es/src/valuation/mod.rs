//! Comparable-sales valuation pipeline
//!
//! Stages, in order:
//! 1. Comp retrieval through a [`CompSource`](crate::sources::CompSource)
//! 2. Type filter ([`selection::filter_by_type`])
//! 3. Price adjustment ([`adjustment`])
//! 4. Similarity scoring ([`similarity`])
//! 5. Top-N selection ([`selection::select_top`])
//! 6. Weighted percentiles ([`percentile`])
//! 7. Confidence tier ([`confidence`])
//! 8. Result assembly ([`pipeline`])
//!
//! Only stage 1 suspends. Stages 2-8 are a pure function of the retrieved
//! comps, the subject and the reference date.

pub mod adjustment;
pub mod confidence;
pub mod percentile;
pub mod pipeline;
pub mod selection;
pub mod similarity;

pub use pipeline::{estimate, value_comps, ValuationParams};

use compest_common::models::ValidationError;
use thiserror::Error;

/// Valuation pipeline errors
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Subject property failed field validation
    #[error("Invalid property: {0}")]
    Validation(#[from] ValidationError),

    /// No comp of the subject's property type was retrieved
    #[error("No comparable properties found")]
    NoComparablesFound,

    /// The comp source failed; its error is passed through untouched
    #[error("Comp retrieval failed: {0}")]
    Retrieval(#[source] anyhow::Error),

    /// An internal contract was broken (a bug, not a data problem)
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}
