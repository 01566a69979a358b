//! Food proxy handlers: `search-food` and `get-food-by-barcode`.
//!
//! Both forward one request to the food database and reshape the answer into
//! `{ "items": [FoodItem] }`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{ALLOWED_HEADERS, AppState, error::ApiError};
use crate::core::food::FoodItem;

/// Query of `search-food`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/// Query of `get-food-by-barcode`.
#[derive(Debug, Deserialize)]
pub struct BarcodeParams {
    barcode: Option<String>,
}

/// Success body of both endpoints.
#[derive(Debug, Serialize)]
pub struct FoodItems {
    /// Matching products
    pub items: Vec<FoodItem>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(name))
}

/// `GET /search-food?q=`
#[instrument(skip(state))]
pub async fn search_food_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<FoodItems>, ApiError> {
    let query = required(params.q, "q")?;

    let items = state.lookup.search(&query).await?;
    info!("Search for {query:?} returned {} items", items.len());

    Ok(Json(FoodItems { items }))
}

/// `GET /get-food-by-barcode?barcode=`
#[instrument(skip(state))]
pub async fn barcode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BarcodeParams>,
) -> Result<Json<FoodItems>, ApiError> {
    let barcode = required(params.barcode, "barcode")?;

    let item = state.lookup.by_barcode(&barcode).await?;

    Ok(Json(FoodItems { items: vec![item] }))
}

/// `OPTIONS` on the food routes: a plain `ok` carrying the CORS headers.
pub async fn preflight_handler() -> impl IntoResponse {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
        ],
        "ok",
    )
}
