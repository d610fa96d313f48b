//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (outermost first)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │ Error Responder  │ ← renders every AppError as {error, stack?}
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Request Logger  │ ← method/path/timestamp, X-Request-Id, metrics
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ Tracing / Panics │ ← HTTP span; panics become 500
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │   CORS / Limit   │
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Authentication  │ ← 401 if invalid (only under /api)
//! └────────┬─────────┘
//!          ▼
//!      Handler
//! ```
//!
//! # Route Matching
//!
//! `/api/products/search` and `/api/products/stats` are literal routes and
//! always win over `/api/products/{id}`: the router prefers static segments to
//! captures regardless of registration order.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::{
    ApiKeyAuth, ErrorResponder, RequestLoggerLayer, handle_panic, respond_to_errors,
};
use crate::state::AppState;

/// Prefix under which every authenticated route is mounted.
pub const API_PREFIX: &str = "/api";

/// Build the application router with all routes and middleware configured.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/products/search", get(handlers::search_products))
        .route("/products/stats", get(handlers::product_stats))
        .route(
            "/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .layer(ApiKeyAuth::new(config.api_key.clone()));

    info!(
        production = config.is_production(),
        max_body_bytes = config.max_request_body_size,
        "Building router"
    );

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest(API_PREFIX, api)
        .fallback(handlers::route_not_found)
        .layer(DefaultBodyLimit::max(config.max_request_body_size))
        .layer(build_cors_layer(&config.cors_allowed_origins))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(RequestLoggerLayer::new())
        .layer(from_fn_with_state(
            ErrorResponder::from_config(&config),
            respond_to_errors,
        ))
        .with_state(state)
}

/// Build CORS layer from configuration.
///
/// `*` allows any origin; otherwise only the listed origins that parse as
/// header values are allowed.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
