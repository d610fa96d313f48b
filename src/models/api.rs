use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// Query parameters accepted by `GET /api/products`.
///
/// Pagination values are kept as raw strings: malformed values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    /// Exact, case-sensitive category filter
    pub category: Option<String>,
    /// Case-insensitive substring matched against the product name
    pub search: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<String>,
    /// Page size (default: 10)
    pub limit: Option<String>,
}

/// Query parameters accepted by `GET /api/products/search`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchParams {
    /// Required search term
    pub name: Option<String>,
}

/// Paginated envelope returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Number of matches before pagination
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub results: Vec<Product>,
}

/// Aggregate statistics over the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: usize,
    /// Mean price rounded to two decimals, 0 for an empty catalog
    pub avg_price: f64,
    pub count_by_category: BTreeMap<String, usize>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub products_count: usize,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}
