use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use product_api::{AppState, Config, ProductStore, build_router, config, metrics};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter())
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!(
        "Starting Product Catalog API v{}",
        env!("CARGO_PKG_VERSION")
    );

    match run().await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Run the application, returning an exit code on error.
async fn run() -> Result<(), exitcode::ExitCode> {
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {e}");
        exitcode::CONFIG
    })?;
    info!(
        host = %config.host,
        port = %config.port,
        production = config.is_production(),
        seed_sample_data = config.seed_sample_data,
        "Configuration loaded"
    );
    if config.uses_default_api_key() {
        warn!("API_KEY is not set; using the built-in placeholder key");
    }

    if let Some(addr) = config.metrics_addr() {
        metrics::try_init_metrics(addr);
    }

    let store = if config.seed_sample_data {
        ProductStore::with_sample_data().map_err(|e| {
            error!("Failed to seed sample data: {e}");
            exitcode::SOFTWARE
        })?
    } else {
        ProductStore::new()
    };
    metrics::set_product_count(store.len());
    info!(products = store.len(), "Product store ready");

    let app = build_router(AppState::new(store, config.clone()));

    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        error!("Invalid server address: {e}");
        exitcode::CONFIG
    })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("API endpoints (require X-API-Key):");
    info!("  GET    /api/products            - List (category, search, page, limit)");
    info!("  GET    /api/products/search     - Search by name");
    info!("  GET    /api/products/stats      - Statistics");
    info!("  GET    /api/products/{{id}}       - Get product");
    info!("  POST   /api/products            - Create product");
    info!("  PUT    /api/products/{{id}}       - Replace product");
    info!("  DELETE /api/products/{{id}}       - Delete product");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {e}");
            exitcode::SOFTWARE
        })?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed, that signal is ignored and the other one
/// still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => warn!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
