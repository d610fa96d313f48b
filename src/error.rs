use std::fmt;
use std::panic::Location;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Classification of a failure.
///
/// The kind is fixed at the raise site and decides the HTTP status. No later
/// stage re-classifies an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Unclassified fault (500).
    Internal,
    /// Requested resource does not exist (404).
    NotFound,
    /// Request payload or parameters are invalid (400).
    Validation,
    /// Missing or wrong API key (401).
    Unauthorized,
}

impl ErrorKind {
    /// HTTP status returned for this kind.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message used when the raise site does not supply one.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Internal => "Internal Server Error",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::Validation => "Validation failed",
            ErrorKind::Unauthorized => "Unauthorized",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ErrorKind::Internal => "InternalError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Unauthorized => "UnauthorizedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Application-wide error: a kind, a message and the source location where it
/// was raised.
///
/// Constructors are `#[track_caller]`, so the recorded location is the line
/// that detected the failure rather than this module.
///
/// # Example
///
/// ```rust
/// use product_api::error::{AppError, ErrorKind};
///
/// let err = AppError::not_found("Product not found");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.status().as_u16(), 404);
/// ```
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    location: &'static Location<'static>,
}

impl AppError {
    /// Raise an error of `kind` with a custom message.
    ///
    /// An empty message falls back to the kind's default message.
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            message
        };

        Self {
            kind,
            message,
            location: Location::caller(),
        }
    }

    /// Raise an error of `kind` carrying its default message.
    #[track_caller]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Diagnostic trace: the kind, the message and the raise site.
    pub fn trace(&self) -> String {
        format!(
            "{}: {}\n    at {}:{}:{}",
            self.kind,
            self.message,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )
    }

    /// Snapshot handed to the error responder through response extensions.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind,
            message: self.message.clone(),
            trace: self.trace(),
        }
    }
}

/// Error details attached to a failed response.
///
/// Handlers and middleware never write error bodies themselves: they return an
/// `AppError`, whose response carries this report as an extension, and
/// `middleware::error_responder` renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub trace: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self.report());
        response
    }
}

// Extractor rejections are converted inside axum's generated code, so the
// recorded location is this conversion.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation(format!(
            "Invalid query parameters: {}",
            rejection.body_text()
        ))
    }
}

impl From<serde_json::Error> for AppError {
    #[track_caller]
    fn from(e: serde_json::Error) -> Self {
        AppError::validation(format!("Invalid request body: {e}"))
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
