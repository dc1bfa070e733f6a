// Server module - Binds the HTTP surface and runs until shutdown

use crate::api::{build_router, AppState};
use crate::config::ServiceConfig;
use crate::error::{LogtailError, Result};
use crate::logs::LogRegistry;
use tokio::net::TcpListener;
use tokio::signal;

/// Initialize the log registry and serve HTTP until a shutdown signal arrives
///
/// A log directory that cannot be created or written is returned as an
/// error before anything is bound.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let registry = LogRegistry::from_config(&config)?;
    let addr = config.socket_addr()?;

    let app = build_router(AppState::new(registry), &config);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| LogtailError::ServerError(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("  - Log services: http://{}/logs", addr);
    tracing::info!("  - Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LogtailError::ServerError(e.to_string()))?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Resolve when Ctrl-C or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
