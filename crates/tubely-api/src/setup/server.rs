//! Server startup and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tubely_core::Config;

/// Bind the configured port and serve until a shutdown signal arrives
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", config.server_port()))
        .await
        .with_context(|| format!("Failed to bind port {}", config.server_port()))?;
    let addr = listener.local_addr()?;

    tracing::info!(
        addr = %addr,
        backend = %config.thumbnail_backend(),
        max_upload_bytes = config.max_upload_bytes(),
        public_base_url = %config.thumbnails.public_base_url,
        "Listening for thumbnail uploads"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated with an error")
}

/// Resolves on Ctrl+C, or SIGTERM on unix. A listener that cannot be installed
/// is logged and never fires, so the server keeps running.
async fn shutdown_signal() {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::warn!(error = %e, "Ctrl+C listener unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM listener unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };

    tracing::info!(signal = received, "Draining connections before exit");
}
