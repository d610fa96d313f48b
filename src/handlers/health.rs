//! Informational endpoints outside the authenticated `/api` prefix.
//!
//! - `GET /` - Plain-text banner
//! - `GET /health` - Liveness with catalog size and uptime
//!
//! Any other unmatched path ends in [`route_not_found`].

use axum::Json;
use axum::extract::State;
use axum::http::Uri;
use chrono::Utc;
use tracing::instrument;

use crate::error::AppError;
use crate::models::HealthResponse;
use crate::state::AppState;

/// Root endpoint.
pub async fn root() -> &'static str {
    "Product Catalog API is running. Product routes live under /api/products."
}

/// Health check endpoint.
///
/// # Response Body
///
/// ```json
/// {
///   "status": "ok",
///   "version": "0.1.0",
///   "productsCount": 3,
///   "uptimeSeconds": 42,
///   "timestamp": "2024-01-15T10:30:00Z"
/// }
/// ```
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        products_count: state.store.len(),
        uptime_seconds: state.uptime_seconds(),
        timestamp: Utc::now(),
    })
}

/// Fallback for unknown routes.
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}
