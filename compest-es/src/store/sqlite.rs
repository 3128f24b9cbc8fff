//! SQLite-backed result store
//!
//! Schema (created on connect, idempotent):
//!
//! ```sql
//! CREATE TABLE estimates (
//!     id           TEXT PRIMARY KEY,
//!     created_at   TEXT NOT NULL,
//!     request_json TEXT NOT NULL,
//!     result_json  TEXT NOT NULL
//! )
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use compest_common::models::{EstimateRequest, EstimateResult};
use compest_common::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::{ResultStore, StoredEstimate};

const MAX_CONNECTIONS: u32 = 5;

/// Result store persisting to an SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database and ensure the schema exists
    ///
    /// Accepts either an `sqlite:` URL or a bare file path.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)?
        } else {
            SqliteConnectOptions::new().filename(database_url)
        }
        .create_if_missing(true);

        // Each connection to an in-memory database sees its own empty database
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            MAX_CONNECTIONS
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.create_schema().await?;
        info!(database = %database_url, "Opened estimate database");
        Ok(store)
    }

    async fn create_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS estimates (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                request_json TEXT NOT NULL,
                result_json TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ResultStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn save(&self, estimate: StoredEstimate) -> Result<()> {
        let request_json = to_json(&estimate.request)?;
        let result_json = to_json(&estimate.result)?;

        sqlx::query(
            "INSERT OR REPLACE INTO estimates (id, created_at, request_json, result_json) VALUES (?, ?, ?, ?)",
        )
        .bind(&estimate.id)
        .bind(estimate.created_at)
        .bind(request_json)
        .bind(result_json)
        .execute(&self.pool)
        .await?;

        debug!(estimate_id = %estimate.id, "Saved estimate");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredEstimate>> {
        let row: Option<(String, DateTime<Utc>, String, String)> = sqlx::query_as(
            "SELECT id, created_at, request_json, result_json FROM estimates WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, created_at, request_json, result_json)) = row else {
            return Ok(None);
        };

        let request: EstimateRequest = from_json(&id, &request_json)?;
        let result: EstimateResult = from_json(&id, &result_json)?;
        Ok(Some(StoredEstimate {
            id,
            created_at,
            request,
            result,
        }))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Internal(format!("Failed to serialize estimate: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(id: &str, json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| Error::Internal(format!("Corrupt stored estimate {}: {}", id, e)))
}
