//! Comp sources
//!
//! A comp source turns a subject address/property and a search window into
//! zero or more [`Comp`]s. The pipeline only sees the [`CompSource`] trait
//! object; which implementation backs it is decided once at startup by
//! [`build_comp_source`].
//!
//! Available providers:
//! - `synthetic` (alias `fake`): deterministic seeded generator
//! - `file`: fixed comp list loaded from a JSON file

pub mod fixed;
pub mod synthetic;

pub use fixed::StaticCompSource;
pub use synthetic::SyntheticCompSource;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use compest_common::config::ServiceConfig;
use compest_common::models::{AddressSpec, Comp, PropertySpec};
use compest_common::{Error, Result};
use tracing::info;

/// Search window for one retrieval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompQuery {
    pub radius_km: f64,
    /// Recency window in days
    pub days: u32,
    /// Date the recency window ends on
    pub as_of: NaiveDate,
}

/// Supplier of comparable properties
///
/// Errors are provider-defined; the pipeline propagates them without
/// interpretation or retry.
#[async_trait]
pub trait CompSource: Send + Sync {
    /// Provider name for logging and health output
    fn name(&self) -> &'static str;

    /// Retrieve candidate comps for the subject
    async fn get_comps(
        &self,
        address: &AddressSpec,
        property: &PropertySpec,
        query: &CompQuery,
    ) -> anyhow::Result<Vec<Comp>>;
}

/// Construct the configured comp source
pub fn build_comp_source(config: &ServiceConfig) -> Result<Arc<dyn CompSource>> {
    let source: Arc<dyn CompSource> = match config.provider.as_str() {
        "synthetic" | "fake" => Arc::new(SyntheticCompSource::new()),
        "file" => {
            let path = config.comps_file.as_deref().ok_or_else(|| {
                Error::Config("provider 'file' requires comps_file to be set".to_string())
            })?;
            Arc::new(StaticCompSource::from_json_file(path)?)
        }
        other => {
            return Err(Error::Config(format!("Unknown provider: {}", other)));
        }
    };

    info!(provider = source.name(), "Comp source ready");
    Ok(source)
}
