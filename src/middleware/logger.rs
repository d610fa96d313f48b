//! Request logging middleware.
//!
//! First stage of the pipeline. For every request it:
//!
//! 1. Reuses the client's `X-Request-Id` header or generates a UUIDv4
//! 2. Logs method, path and the time the request was received
//! 3. Calls through unconditionally (this stage never rejects a request)
//! 4. Logs status and latency, records request metrics and echoes
//!    `X-Request-Id` on the response
//!
//! ```bash
//! curl -H "X-Request-Id: my-correlation-id" http://localhost:3000/
//! ```

use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::header::HeaderValue;
use axum::http::{Request, Response};
use chrono::{SecondsFormat, Utc};
use tower::{Layer, Service};
use tracing::info;
use uuid::Uuid;

use crate::metrics;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

static UNKNOWN_REQUEST_ID: HeaderValue = HeaderValue::from_static("unknown");

/// Request logging layer.
#[derive(Clone, Default)]
pub struct RequestLoggerLayer;

impl RequestLoggerLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger { inner }
    }
}

/// Request logging service wrapper.
#[derive(Clone)]
pub struct RequestLogger<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestLogger<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let request_id = extract_or_generate_request_id(&req);
        let header_value = HeaderValue::from_str(&request_id)
            .unwrap_or_else(|_| UNKNOWN_REQUEST_ID.clone());
        req.headers_mut()
            .insert(REQUEST_ID_HEADER, header_value.clone());

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "Request received"
        );

        let started = Instant::now();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            let elapsed = started.elapsed();

            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER, header_value);

            let status = response.status().as_u16();
            info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                latency_ms = elapsed.as_millis() as u64,
                "Request completed"
            );
            metrics::record_request(method.as_str(), status, elapsed.as_secs_f64());

            Ok(response)
        })
    }
}

/// Extract request ID from headers or generate a new one.
fn extract_or_generate_request_id<B>(req: &Request<B>) -> String {
    if let Some(header_value) = req.headers().get(REQUEST_ID_HEADER)
        && let Ok(value) = header_value.to_str()
        && !value.is_empty()
    {
        return value.to_string();
    }

    Uuid::new_v4().to_string()
}
