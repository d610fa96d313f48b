//! Prometheus metrics for application observability.
//!
//! Metrics are exposed via a dedicated HTTP listener when `METRICS_PORT` is
//! set. Until a recorder is installed every recording function is a no-op, so
//! handlers and tests can call them unconditionally.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `catalog_http_requests_total` - Requests served (labels: method, status)
//! - `catalog_product_mutations_total` - Store mutations (label: operation)
//! - `catalog_auth_failures_total` - Rejected API keys (label: reason)
//!
//! ## Histograms
//! - `catalog_request_duration_seconds` - Request latency (labels: method, status)
//!
//! ## Gauges
//! - `catalog_products` - Products currently in the store

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "catalog_http_requests_total";
    pub const PRODUCT_MUTATIONS_TOTAL: &str = "catalog_product_mutations_total";
    pub const AUTH_FAILURES_TOTAL: &str = "catalog_auth_failures_total";
    pub const REQUEST_DURATION_SECONDS: &str = "catalog_request_duration_seconds";
    pub const PRODUCTS: &str = "catalog_products";
}

/// Store mutation kinds used as the `operation` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Replace,
    Remove,
}

impl Mutation {
    fn as_label(self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Replace => "replace",
            Mutation::Remove => "remove",
        }
    }
}

/// Install the Prometheus exporter and describe all metrics.
///
/// # Errors
///
/// Returns a message if the exporter cannot be installed (e.g. the port is
/// taken or a recorder is already set).
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(names::HTTP_REQUESTS_TOTAL, "Total number of HTTP requests served");
    describe_counter!(
        names::PRODUCT_MUTATIONS_TOTAL,
        "Total number of successful product create/replace/remove operations"
    );
    describe_counter!(
        names::AUTH_FAILURES_TOTAL,
        "Total number of requests rejected by API key authentication"
    );
    describe_histogram!(
        names::REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );
    describe_gauge!(names::PRODUCTS, "Number of products currently stored");

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    counter!(names::HTTP_REQUESTS_TOTAL, "method" => method.to_string(), "status" => status.clone())
        .increment(1);
    histogram!(names::REQUEST_DURATION_SECONDS, "method" => method.to_string(), "status" => status)
        .record(duration_secs);
}

/// Record a successful store mutation and the resulting store size.
pub fn record_mutation(mutation: Mutation, products: usize) {
    counter!(names::PRODUCT_MUTATIONS_TOTAL, "operation" => mutation.as_label()).increment(1);
    set_product_count(products);
}

/// Record a rejected API key (`reason` is `missing` or `invalid`).
pub fn record_auth_failure(reason: &'static str) {
    counter!(names::AUTH_FAILURES_TOTAL, "reason" => reason).increment(1);
}

/// Update the product count gauge.
pub fn set_product_count(products: usize) {
    gauge!(names::PRODUCTS).set(products as f64);
}
