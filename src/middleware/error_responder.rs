//! Terminal error rendering.
//!
//! Every other stage signals failure by returning an [`AppError`], whose
//! response carries only a status and an [`ErrorReport`] extension. This
//! middleware wraps the whole router and is the one place that turns a report
//! into a body:
//!
//! ```json
//! { "error": "Product with id 'x' not found", "stack": "NotFoundError: ..." }
//! ```
//!
//! `stack` is omitted in production mode. Successful responses without a
//! report pass through untouched; error statuses without one get a body
//! derived from the status.

use std::any::Any;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::config::Config;
use crate::error::{AppError, ErrorReport};

/// Body written for every failed request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

/// Rendering policy for error responses.
#[derive(Debug, Clone, Copy)]
pub struct ErrorResponder {
    expose_stack: bool,
}

impl ErrorResponder {
    pub fn new(expose_stack: bool) -> Self {
        Self { expose_stack }
    }

    /// Stack traces are exposed everywhere except production.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.is_production())
    }

    /// Replace the body of a failed response with the structured error body.
    ///
    /// Error statuses produced by the framework itself (such as 405 for a
    /// known path with an unsupported method) carry no report; they get a body
    /// built from the status line.
    pub fn render(&self, response: Response) -> Response {
        let (mut parts, body) = response.into_parts();
        let report = match parts.extensions.remove::<ErrorReport>() {
            Some(report) => FailureReport {
                kind: report.kind.to_string(),
                message: report.message,
                trace: report.trace,
            },
            None if parts.status.is_client_error() || parts.status.is_server_error() => {
                FailureReport::from_status(parts.status)
            }
            None => return Response::from_parts(parts, body),
        };

        if parts.status.is_server_error() {
            error!(
                status = parts.status.as_u16(),
                kind = %report.kind,
                error = %report.message,
                trace = %report.trace,
                "Request failed"
            );
        } else {
            warn!(
                status = parts.status.as_u16(),
                kind = %report.kind,
                error = %report.message,
                "Request rejected"
            );
        }

        let (rendered_parts, rendered_body) = Json(ErrorBody {
            error: report.message,
            stack: self.expose_stack.then_some(report.trace),
        })
        .into_response()
        .into_parts();

        parts.headers.remove(CONTENT_LENGTH);
        if let Some(content_type) = rendered_parts.headers.get(CONTENT_TYPE) {
            parts.headers.insert(CONTENT_TYPE, content_type.clone());
        }

        Response::from_parts(parts, rendered_body)
    }
}

/// Failure details ready for rendering.
struct FailureReport {
    kind: String,
    message: String,
    trace: String,
}

impl FailureReport {
    fn from_status(status: StatusCode) -> Self {
        let message = status.canonical_reason().unwrap_or("Request failed").to_string();
        Self {
            kind: "HttpError".to_string(),
            trace: format!("HttpError: {} {message}", status.as_u16()),
            message,
        }
    }
}

/// Middleware entry point, installed with `axum::middleware::from_fn_with_state`.
pub async fn respond_to_errors(
    State(responder): State<ErrorResponder>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    responder.render(response)
}

/// Convert a handler panic into an internal error.
///
/// Clients only ever see the generic message; the panic payload goes into the
/// diagnostic trace.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    let err = AppError::from_kind(crate::error::ErrorKind::Internal);
    let mut report = err.report();
    report.trace.push_str(&format!("\n    panicked: {detail}"));

    let mut response = err.status().into_response();
    response.extensions_mut().insert(report);
    response
}
