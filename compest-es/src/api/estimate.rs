//! Estimate endpoints
//!
//! - `POST /estimate`: validate, value, persist, respond with the result
//! - `GET /estimate/:id`: previously stored result

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use compest_common::models::{EstimateRequest, EstimateResult};
use compest_common::time;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::store::StoredEstimate;
use crate::valuation::{self, ValuationParams};
use crate::AppState;

/// POST /estimate
pub async fn post_estimate(
    State(state): State<AppState>,
    body: Result<Json<EstimateRequest>, JsonRejection>,
) -> ApiResult<Json<EstimateResult>> {
    let Json(request) = body?;
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let params = ValuationParams::new(
        state.search,
        state.reference_date.unwrap_or_else(time::today),
    );
    debug!(
        zip = %request.address.zip,
        property_type = %request.property.property_type,
        reference_date = %params.reference_date,
        "Estimate requested"
    );

    let result = valuation::estimate(
        state.comp_source.as_ref(),
        &request.address,
        &request.property,
        &params,
    )
    .await?;

    state
        .store
        .save(StoredEstimate::new(&request, &result))
        .await?;
    info!(estimate_id = %result.id, "Estimate stored");

    Ok(Json(result))
}

/// GET /estimate/:id
pub async fn get_estimate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EstimateResult>> {
    match state.store.get(&id).await? {
        Some(stored) => Ok(Json(stored.result)),
        None => Err(ApiError::NotFound(format!("Estimate {} not found", id))),
    }
}

/// Build estimate routes
pub fn estimate_routes() -> Router<AppState> {
    Router::new()
        .route("/estimate", post(post_estimate))
        .route("/estimate/:id", get(get_estimate))
}
