//! Read-side views over the catalog: listing, name search and statistics.
//!
//! All functions work on an owned snapshot taken from the store, never on the
//! live collection.
//!
//! # Listing pipeline
//!
//! ```text
//! snapshot → category filter → name search → total → page/limit → slice
//! ```
//!
//! The category filter is an exact, case-sensitive comparison; the name search
//! is a case-insensitive substring match on the trimmed term, here and in
//! [`search_by_name`]. `total` is counted after filtering
//! and before slicing, so a page past the end returns no results but still
//! reports how many products matched.

use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::models::{ListParams, Product, ProductPage, ProductStats};

/// Page used when `page` is missing or unparseable.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when `limit` is missing or unparseable.
pub const DEFAULT_LIMIT: usize = 10;

/// Filter, search and paginate a product snapshot.
pub fn query(products: Vec<Product>, params: &ListParams) -> ProductPage {
    let matched: Vec<Product> = products
        .into_iter()
        .filter(|p| matches_category(p, params.category.as_deref()))
        .filter(|p| matches_search(p, params.search.as_deref()))
        .collect();

    let total = matched.len();
    let page = parse_positive(params.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive(params.limit.as_deref(), DEFAULT_LIMIT);
    let start = (page - 1).saturating_mul(limit);

    let results = matched.into_iter().skip(start).take(limit).collect();

    ProductPage {
        total,
        page,
        limit,
        results,
    }
}

/// Products whose name contains `name`, ignoring case. No pagination.
///
/// # Errors
///
/// Returns a validation error if `name` is missing or blank.
pub fn search_by_name(products: Vec<Product>, name: Option<&str>) -> AppResult<Vec<Product>> {
    let term = name
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Query parameter 'name' is required"))?;

    Ok(products
        .into_iter()
        .filter(|p| name_contains(p, term))
        .collect())
}

/// Count, average price and per-category counts over `products`.
pub fn stats(products: &[Product]) -> ProductStats {
    let total = products.len();

    let avg_price = if total == 0 {
        0.0
    } else {
        let count = total as f64;
        round_cents(products.iter().map(|p| p.price / count).sum())
    };

    let mut count_by_category = BTreeMap::new();
    for product in products {
        *count_by_category
            .entry(product.category.clone())
            .or_insert(0) += 1;
    }

    ProductStats {
        total,
        avg_price,
        count_by_category,
    }
}

fn matches_category(product: &Product, category: Option<&str>) -> bool {
    category.is_none_or(|c| product.category == c)
}

fn matches_search(product: &Product, search: Option<&str>) -> bool {
    search.is_none_or(|term| name_contains(product, term.trim()))
}

fn name_contains(product: &Product, term: &str) -> bool {
    product.name.to_lowercase().contains(&term.to_lowercase())
}

/// Round to two decimals. Values too large to scale are already integral.
fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

/// Parse a pagination value, clamped to at least 1.
///
/// Only the leading integer is read, so `"3"`, `" 3"`, `"3rd"` and `"3.7"`
/// all give 3. Values with no leading integer fall back to `default`; zero and
/// negative values become 1. Values too large for `usize` saturate.
pub fn parse_positive(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw.map(str::trim_start) else {
        return default;
    };

    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest.get(..end).unwrap_or_default();
    if digits.is_empty() {
        return default;
    }

    if negative {
        return 1;
    }

    digits.parse::<usize>().unwrap_or(usize::MAX).max(1)
}
