//! HTTP middleware pipeline.
//!
//! # Architecture
//!
//! ```text
//! Request → Error Responder → Logger → Trace → Catch Panic → CORS → Router
//!                                                                    │
//!                                            /api/* → Auth → Extract → Handler
//!              ↑                                        │               │
//!              └──────────── AppError (401/400/404/500) ┴───────────────┘
//! ```
//!
//! - The **logger** always calls through and tags every response with
//!   `X-Request-Id`.
//! - **Auth** rejects `/api` requests without the configured key before any
//!   parsing or handler runs.
//! - The **error responder** is the only stage that writes error bodies.

pub mod auth;
pub mod error_responder;
pub mod logger;

pub use auth::{API_KEY_HEADER, ApiKeyAuth};
pub use error_responder::{ErrorResponder, handle_panic, respond_to_errors};
pub use logger::{REQUEST_ID_HEADER, RequestLoggerLayer};
