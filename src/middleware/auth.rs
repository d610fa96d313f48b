//! API key authentication middleware.
//!
//! Applied to every route under `/api`. The root informational endpoints
//! (`/`, `/health`) are mounted outside that prefix and never reach this layer.
//!
//! # Credential lookup
//!
//! 1. `X-API-Key` header (preferred)
//! 2. `Authorization` header (fallback, compared as-is)
//!
//! ```bash
//! curl -H "X-API-Key: your-secret-key" http://localhost:3000/api/products
//! curl -H "Authorization: your-secret-key" http://localhost:3000/api/products
//! ```
//!
//! Keys are compared in constant time. A missing or wrong key short-circuits
//! the request with an unauthorized error; the handler never runs.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::metrics;

/// Primary header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// API key authentication layer.
#[derive(Clone)]
pub struct ApiKeyAuth {
    expected_key: Arc<String>,
}

impl ApiKeyAuth {
    /// Create a layer that accepts exactly `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            expected_key: Arc::new(api_key.into()),
        }
    }
}

impl<S> Layer<S> for ApiKeyAuth {
    type Service = ApiKeyAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuthService {
            inner,
            expected_key: self.expected_key.clone(),
        }
    }
}

/// API key authentication service wrapper.
#[derive(Clone)]
pub struct ApiKeyAuthService<S> {
    inner: S,
    expected_key: Arc<String>,
}

impl<S> Service<Request<Body>> for ApiKeyAuthService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let verdict = authenticate(&req, &self.expected_key);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match verdict {
                Ok(()) => inner.call(req).await,
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

/// Check the request's credential against the expected key.
fn authenticate<B>(req: &Request<B>, expected: &str) -> Result<(), AppError> {
    let path = req.uri().path();

    match extract_api_key(req) {
        Some(provided) if constant_time_eq(provided, expected) => {
            debug!(path, "API key authentication successful");
            Ok(())
        }
        Some(_) => {
            metrics::record_auth_failure("invalid");
            warn!(path, "Invalid API key provided");
            Err(AppError::unauthorized("Invalid API key"))
        }
        None => {
            metrics::record_auth_failure("missing");
            warn!(path, "Missing API key");
            Err(AppError::unauthorized("Missing API key"))
        }
    }
}

/// Extract the API key, preferring `X-API-Key` over `Authorization`.
///
/// Headers that are not valid visible ASCII are treated as absent.
fn extract_api_key<B>(req: &Request<B>) -> Option<&str> {
    [API_KEY_HEADER, AUTHORIZATION.as_str()]
        .into_iter()
        .find_map(|name| req.headers().get(name).and_then(|v| v.to_str().ok()))
}

/// Perform constant-time comparison of two strings.
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
