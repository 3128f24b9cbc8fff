//! Fixed comp list
//!
//! Returns the same comps for every request, in load order. Backs the `file`
//! provider and gives tests a fully controlled comp set.

use std::path::Path;

use async_trait::async_trait;
use compest_common::models::{AddressSpec, Comp, PropertySpec};
use compest_common::{Error, Result};
use tracing::info;

use super::{CompQuery, CompSource};

/// Comp source over an in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticCompSource {
    comps: Vec<Comp>,
}

impl StaticCompSource {
    pub fn new(comps: Vec<Comp>) -> Self {
        Self { comps }
    }

    /// Load a JSON array of comps, validating every entry
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let comps: Vec<Comp> = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid comps file {}: {}", path.display(), e))
        })?;

        for comp in &comps {
            comp.validate().map_err(|e| {
                Error::InvalidInput(format!("Comp '{}' in {}: {}", comp.id, path.display(), e))
            })?;
        }

        info!("Loaded {} comps from {}", comps.len(), path.display());
        Ok(Self::new(comps))
    }

    pub fn comps(&self) -> &[Comp] {
        &self.comps
    }
}

#[async_trait]
impl CompSource for StaticCompSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get_comps(
        &self,
        _address: &AddressSpec,
        _property: &PropertySpec,
        _query: &CompQuery,
    ) -> anyhow::Result<Vec<Comp>> {
        Ok(self.comps.clone())
    }
}
