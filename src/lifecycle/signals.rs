//! OS signal handling.
//!
//! - SIGINT (Ctrl+C) and SIGTERM end the process gracefully
//! - SIGHUP reloads the reference tables from the configured directory

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::tables::TableStore;

/// Resolve on the first Ctrl+C or SIGTERM.
pub async fn terminate() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = sigterm => {}
    }
    tracing::info!("Shutdown signal received");
}

/// Reload the tables on every SIGHUP until shutdown.
#[cfg(unix)]
pub async fn reload_on_hangup(store: Arc<TableStore>, mut shutdown: broadcast::Receiver<()>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for SIGHUP, signal reload disabled");
            return;
        }
    };

    loop {
        tokio::select! {
            Some(()) = hangup.recv() => {
                tracing::info!("SIGHUP received, reloading tables");
                let store = store.clone();
                // Errors are logged by the store; the current tables stay.
                if let Err(e) = tokio::task::spawn_blocking(move || store.reload(None)).await {
                    tracing::error!(error = %e, "Reload task panicked");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}

#[cfg(not(unix))]
pub async fn reload_on_hangup(_store: Arc<TableStore>, mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
}
