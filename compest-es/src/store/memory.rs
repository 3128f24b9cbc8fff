//! In-process result store

use std::collections::HashMap;

use async_trait::async_trait;
use compest_common::Result;
use tokio::sync::RwLock;

use super::{ResultStore, StoredEstimate};

/// Results held in a map for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    estimates: RwLock<HashMap<String, StoredEstimate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, estimate: StoredEstimate) -> Result<()> {
        self.estimates
            .write()
            .await
            .insert(estimate.id.clone(), estimate);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredEstimate>> {
        Ok(self.estimates.read().await.get(id).cloned())
    }
}
