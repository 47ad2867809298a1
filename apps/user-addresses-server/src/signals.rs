use tokio::signal;

/// Resolve once Ctrl+C or SIGTERM arrives.
///
/// A handler that fails to install is logged and then never fires, so the
/// other signal still shuts the server down.
pub async fn wait_for_shutdown() {
    tokio::select! {
        () = wait_ctrl_c() => {},
        () = wait_sigterm() => {},
    }

    tracing::info!("Shutdown signal received, initiating graceful shutdown");
}

async fn wait_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => {
            tracing::error!(%e, "Error handling Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn wait_sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut handler) => {
            handler.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        Err(e) => {
            tracing::error!(%e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_sigterm() {
    std::future::pending::<()>().await;
}
