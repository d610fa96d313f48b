//! Shared application state for Axum handlers.
//!
//! The state is created once at startup, cloned into every handler and lives
//! for the lifetime of the process. Nothing is persisted: dropping the last
//! clone drops the catalog.
//!
//! Tests build a fresh `AppState` (and therefore a fresh store) per case.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::store::ProductStore;

/// Shared application state for Axum handlers.
///
/// All internal data is behind `Arc`, so cloning is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The product catalog
    pub store: ProductStore,
    /// Application configuration
    pub config: Arc<Config>,
    /// Timestamp when the application started
    pub started_at: Instant,
}

impl AppState {
    /// Create application state around an existing store.
    pub fn new(store: ProductStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Get the application uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
