//! Type filtering and top-N comp selection

use compest_common::models::{AdjustedComp, Comp, PropertyType};

/// Maximum number of comps that contribute to an estimate
pub const MAX_SELECTED_COMPS: usize = 10;

/// A comp with its adjusted price and composite similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredComp {
    pub comp: Comp,
    pub adjusted_price: f64,
    pub score: f64,
}

impl ScoredComp {
    /// Drop the score, keeping the original comp plus its adjusted price
    pub fn into_adjusted(self) -> AdjustedComp {
        AdjustedComp {
            comp: self.comp,
            adjusted_price: self.adjusted_price,
        }
    }
}

/// Keep comps whose property type matches the subject's, in retrieval order
pub fn filter_by_type(comps: Vec<Comp>, property_type: PropertyType) -> Vec<Comp> {
    comps
        .into_iter()
        .filter(|c| c.property_type == property_type)
        .collect()
}

/// Order by descending score and keep at most `limit`
///
/// The sort is stable, so equal scores keep their retrieval order.
pub fn select_top(mut scored: Vec<ScoredComp>, limit: usize) -> Vec<ScoredComp> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}
