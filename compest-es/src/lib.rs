//! compest-es library interface
//!
//! The Estimate Service values a subject property from comparable sales or
//! listings and serves the result over HTTP. The binary in `main.rs` wires
//! configuration, the comp source and the result store into [`AppState`] and
//! serves [`build_router`].

pub mod api;
pub mod error;
pub mod sources;
pub mod store;
pub mod valuation;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use compest_common::config::{SearchConfig, ServiceConfig};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::sources::CompSource;
use crate::store::ResultStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub comp_source: Arc<dyn CompSource>,
    pub store: Arc<dyn ResultStore>,
    /// Search window for every estimate
    pub search: SearchConfig,
    /// Pinned recency reference date; `None` means UTC today per request
    pub reference_date: Option<NaiveDate>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(comp_source: Arc<dyn CompSource>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            comp_source,
            store,
            search: SearchConfig::default(),
            reference_date: None,
            startup_time: Utc::now(),
        }
    }

    /// State with the search window and reference date taken from config
    pub fn from_config(
        config: &ServiceConfig,
        comp_source: Arc<dyn CompSource>,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            search: config.search,
            reference_date: config.reference_date,
            ..Self::new(comp_source, store)
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::estimate_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
