//! # Product Catalog API
//!
//! An in-memory product catalog served over HTTP with Axum, featuring:
//!
//! - **CRUD**: create, fetch, full replace and delete of products
//! - **Querying**: category filter, name search, pagination and statistics
//! - **Security**: shared API key on every `/api` route
//! - **Errors**: one taxonomy, rendered in one place
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Error Responder → Logger → Auth)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (extract → validate → store / query)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Query Engine (filter → search → paginate, stats)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ProductStore (RwLock<Vec<Product>>)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use product_api::{AppState, Config, ProductStore, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let state = AppState::new(ProductStore::with_sample_data()?, config.clone());
//!     let app = build_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Security Configuration
//!
//! ```bash
//! API_KEY=your-secret-key APP_ENV=production cargo run
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod query;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind};
pub use routes::build_router;
pub use state::AppState;
pub use store::ProductStore;
