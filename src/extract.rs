//! Request extractors whose rejections are application errors.
//!
//! axum's own `Json` and `Query` extractors answer malformed input with
//! plain-text responses. These wrappers turn those rejections into
//! validation errors so they flow through the error responder like any other
//! failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonPayload<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);
