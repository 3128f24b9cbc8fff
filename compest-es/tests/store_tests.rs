//! Result store tests for both backends

mod helpers;

use std::collections::BTreeMap;

use chrono::Utc;
use compest_common::models::{AdjustedComp, Confidence, EstimateRequest, EstimateResult};
use compest_es::store::{open_store, MemoryStore, ResultStore, SqliteStore, StoredEstimate};
use compest_es::valuation::value_comps;

fn stored(id: &str) -> StoredEstimate {
    let request = EstimateRequest {
        address: helpers::address(),
        property: helpers::subject(1500, 3),
    };
    let result: EstimateResult = value_comps(
        &request.property,
        helpers::fixture_comps(),
        helpers::reference_date(),
        id.to_string(),
        Utc::now(),
    )
    .unwrap();
    StoredEstimate::new(&request, &result)
}

async fn exercise(store: &dyn ResultStore) {
    assert!(store.get("missing").await.unwrap().is_none());

    let first = stored("est-a");
    store.save(first.clone()).await.unwrap();
    let loaded = store.get("est-a").await.unwrap().unwrap();
    assert_eq!(loaded.request, first.request);
    assert_eq!(loaded.result, first.result);
    assert_eq!(
        loaded.created_at.timestamp_millis(),
        first.created_at.timestamp_millis()
    );

    // Saving the same id again replaces the row
    let mut replacement = stored("est-a");
    replacement.request.property.condition = 5;
    store.save(replacement.clone()).await.unwrap();
    let loaded = store.get("est-a").await.unwrap().unwrap();
    assert_eq!(loaded.request.property.condition, 5);
}

#[tokio::test]
async fn test_memory_store() {
    let store = MemoryStore::new();
    exercise(&store).await;
}

#[tokio::test]
async fn test_sqlite_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("estimates.db");
    let store = SqliteStore::connect(path.to_str().unwrap()).await.unwrap();
    exercise(&store).await;
    assert!(path.exists());
}

#[tokio::test]
async fn test_sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("estimates.db").display());

    {
        let store = SqliteStore::connect(&url).await.unwrap();
        store.save(stored("est-persist")).await.unwrap();
    }

    let reopened = SqliteStore::connect(&url).await.unwrap();
    let loaded = reopened.get("est-persist").await.unwrap().unwrap();
    assert_eq!(loaded.result.id, "est-persist");
}

#[tokio::test]
async fn test_sqlite_in_memory_url() {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    exercise(&store).await;
}

#[tokio::test]
async fn test_open_store_selects_backend() {
    assert_eq!(open_store(None).await.unwrap().backend(), "memory");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("estimates.db");
    let store = open_store(path.to_str()).await.unwrap();
    assert_eq!(store.backend(), "sqlite");
}

/// Estimate whose adjusted prices need all 17 significant digits to survive
fn stored_with_prices(id: &str, prices: &[f64]) -> StoredEstimate {
    let request = EstimateRequest {
        address: helpers::address(),
        property: helpers::subject(1500, 3),
    };
    let comps: Vec<AdjustedComp> = helpers::fixture_comps()
        .into_iter()
        .zip(prices)
        .map(|(comp, &adjusted_price)| AdjustedComp {
            comp,
            adjusted_price,
        })
        .collect();
    let result = EstimateResult::new(
        id.to_string(),
        prices[1],
        prices[0],
        prices[2],
        Confidence::Low,
        comps,
        BTreeMap::new(),
        Utc::now(),
    )
    .unwrap();
    StoredEstimate::new(&request, &result)
}

#[tokio::test]
async fn test_sqlite_preserves_prices_bit_for_bit() {
    let prices = [403404.56228083797, 482157.46946003044, 527779.1234567891];
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.save(stored_with_prices("est-exact", &prices)).await.unwrap();

    let loaded = store.get("est-exact").await.unwrap().unwrap();
    let loaded_prices: Vec<u64> = loaded
        .result
        .comps
        .iter()
        .map(|c| c.adjusted_price.to_bits())
        .collect();
    let expected: Vec<u64> = prices.iter().map(|p| p.to_bits()).collect();
    assert_eq!(loaded_prices, expected);
    assert_eq!(loaded.result.point_estimate.to_bits(), prices[1].to_bits());
}
