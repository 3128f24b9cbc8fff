//! Integration tests for the compest-es HTTP API

mod helpers;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use compest_common::models::PropertyType;
use compest_es::sources::{CompSource, StaticCompSource, SyntheticCompSource};
use compest_es::store::{MemoryStore, ResultStore, SqliteStore};
use compest_es::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn app_with_source(source: Arc<dyn CompSource>) -> Router {
    app_with(source, Arc::new(MemoryStore::new()))
}

fn app_with(source: Arc<dyn CompSource>, store: Arc<dyn ResultStore>) -> Router {
    let mut state = AppState::new(source, store);
    state.reference_date = Some(helpers::reference_date());
    build_router(state)
}

fn test_app() -> Router {
    app_with_source(Arc::new(SyntheticCompSource::new()))
}

fn estimate_body(sqft: i64, baths: f64, condition: i64) -> Value {
    json!({
        "address": {
            "street": "100 Market St",
            "city": "Springfield",
            "state": "IL",
            "zip": "62701"
        },
        "property": {
            "beds": 3,
            "baths": baths,
            "sqft": sqft,
            "type": "single_family",
            "condition": condition,
            "tenure": "sale"
        }
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "compest-es");
    assert_eq!(json["provider"], "synthetic");
    assert_eq!(json["store"], "memory");
    assert!(json["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_post_then_get_round_trip() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/estimate", &estimate_body(1400, 2.0, 4)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;

    let id = created["id"].as_str().unwrap().to_string();
    assert!(created["range_low"].as_f64().unwrap() <= created["point_estimate"].as_f64().unwrap());
    assert!(created["point_estimate"].as_f64().unwrap() <= created["range_high"].as_f64().unwrap());
    assert!(["low", "medium", "high"].contains(&created["confidence"].as_str().unwrap()));
    let comps = created["comps"].as_array().unwrap();
    assert!(!comps.is_empty() && comps.len() <= 10);
    assert!(comps[0]["adjusted_price"].is_number());
    assert_eq!(comps[0]["property_type"], "single_family");
    assert_eq!(comps[0]["source"], "fake");

    let response = app
        .oneshot(get(&format!("/estimate/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, created);
}

#[tokio::test]
async fn test_unknown_estimate_is_not_found() {
    let response = test_app()
        .oneshot(get("/estimate/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_small_sqft_rejected() {
    let response = test_app()
        .oneshot(post_json("/estimate", &estimate_body(250, 2.0, 3)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_quarter_bath_rejected() {
    let response = test_app()
        .oneshot(post_json("/estimate", &estimate_body(1200, 1.25, 3)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_condition_out_of_range_rejected() {
    for condition in [0, 6] {
        let response = test_app()
            .oneshot(post_json("/estimate", &estimate_body(1200, 2.0, condition)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_unknown_property_type_rejected() {
    let mut body = estimate_body(1200, 2.0, 3);
    body["property"]["type"] = json!("castle");
    let response = test_app()
        .oneshot(post_json("/estimate", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/estimate")
        .header("content-type", "application/json")
        .body(Body::from("{\"address\": "))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_matching_comps_is_not_found() {
    let source = StaticCompSource::new(helpers::fixture_comps_of_type(PropertyType::Apartment));
    let response = app_with_source(Arc::new(source))
        .oneshot(post_json("/estimate", &estimate_body(1400, 2.0, 3)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "NO_COMPARABLES_FOUND");
}

#[tokio::test]
async fn test_pinned_reference_date_reproduces_estimate() {
    let app = test_app();
    let mut values = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/estimate", &estimate_body(1400, 2.0, 3)))
            .await
            .unwrap();
        let json = json_body(response).await;
        values.push((json["point_estimate"].clone(), json["comps"].clone()));
    }
    assert_eq!(values[0], values[1]);
}

#[tokio::test]
async fn test_sqlite_backed_get_returns_posted_numbers() {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    let app = app_with(Arc::new(SyntheticCompSource::new()), Arc::new(store));

    for sqft in [900, 1250, 1733] {
        let response = app
            .clone()
            .oneshot(post_json("/estimate", &estimate_body(sqft, 2.0, 4)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/estimate/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);
    }
}
