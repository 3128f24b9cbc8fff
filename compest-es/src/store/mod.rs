//! Estimate persistence
//!
//! Every successful estimate is saved together with the request that
//! produced it, keyed by the estimate id. Backend selection mirrors
//! configuration: a database URL selects SQLite, otherwise results live in
//! process memory and are lost on restart.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use compest_common::models::{EstimateRequest, EstimateResult};
use compest_common::Result;
use tracing::info;

/// One persisted estimate row
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEstimate {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub request: EstimateRequest,
    pub result: EstimateResult,
}

impl StoredEstimate {
    pub fn new(request: &EstimateRequest, result: &EstimateResult) -> Self {
        Self {
            id: result.id.clone(),
            created_at: result.created_at,
            request: request.clone(),
            result: result.clone(),
        }
    }
}

/// Keyed storage of estimate results
///
/// Saving an id that already exists replaces the earlier row.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Backend name for logging and health output
    fn backend(&self) -> &'static str;

    async fn save(&self, estimate: StoredEstimate) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<StoredEstimate>>;
}

/// Open the configured store
pub async fn open_store(database_url: Option<&str>) -> Result<Arc<dyn ResultStore>> {
    let store: Arc<dyn ResultStore> = match database_url {
        Some(url) => Arc::new(SqliteStore::connect(url).await?),
        None => Arc::new(MemoryStore::new()),
    };
    info!(backend = store.backend(), "Result store ready");
    Ok(store)
}
