//! Product endpoints.
//!
//! # Endpoints
//!
//! - `GET /api/products` - Filtered, searched and paginated listing
//! - `GET /api/products/search?name=` - Unpaginated name search
//! - `GET /api/products/stats` - Catalog statistics
//! - `GET /api/products/{id}` - Single product
//! - `POST /api/products` - Create (all fields required)
//! - `PUT /api/products/{id}` - Full replace (all fields required)
//! - `DELETE /api/products/{id}` - Remove
//!
//! Handlers never build error bodies: failures are returned as `AppError`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::AppResult;
use crate::extract::{JsonPayload, QueryParams};
use crate::metrics::{self, Mutation};
use crate::models::{ListParams, Product, ProductPage, ProductStats, SearchParams};
use crate::query;
use crate::state::AppState;
use crate::validation::parse_product_fields;

/// List products.
///
/// # Query Parameters
///
/// - `category` - Exact category match (case-sensitive)
/// - `search` - Case-insensitive substring of the name
/// - `page` - 1-based page number (default: 1)
/// - `limit` - Page size (default: 10)
///
/// # Example
///
/// ```bash
/// curl -H "X-API-Key: $API_KEY" \
///   "http://localhost:3000/api/products?category=electronics&page=1&limit=1"
/// ```
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Json<ProductPage> {
    Json(query::query(state.store.list(), &params))
}

/// Search products by name, without pagination.
#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Vec<Product>>> {
    let found = query::search_by_name(state.store.list(), params.name.as_deref())?;
    Ok(Json(found))
}

/// Catalog statistics.
///
/// # Response Body
///
/// ```json
/// {
///   "total": 3,
///   "avgPrice": 683.33,
///   "countByCategory": { "electronics": 2, "kitchen": 1 }
/// }
/// ```
#[instrument(skip(state))]
pub async fn product_stats(State(state): State<AppState>) -> Json<ProductStats> {
    Json(query::stats(&state.store.list()))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.store.get(&id)?))
}

/// Create a product.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Laptop",
///   "description": "High-performance laptop",
///   "price": 1200,
///   "category": "electronics",
///   "inStock": true
/// }
/// ```
///
/// Every field is required; all violations are reported together.
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<Value>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let fields = parse_product_fields(payload)?;
    let product = state.store.create(fields)?;

    info!(id = %product.id, name = %product.name, "Product created");
    metrics::record_mutation(Mutation::Create, state.store.len());

    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace every field of a product.
///
/// Same body as create. Nothing is merged from the previous version.
#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload<Value>,
) -> AppResult<Json<Product>> {
    let fields = parse_product_fields(payload)?;
    let product = state.store.replace(&id, fields)?;

    info!(id = %product.id, "Product replaced");
    metrics::record_mutation(Mutation::Replace, state.store.len());

    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state.store.remove(&id)?;

    info!(id = %product.id, "Product removed");
    metrics::record_mutation(Mutation::Remove, state.store.len());

    Ok(Json(product))
}
