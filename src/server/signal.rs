// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Wait for the first shutdown signal and return its name
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => Ok("SIGTERM"),
        _ = sigint.recv() => Ok("SIGINT"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}

/// Spawn a task that notifies `shutdown` once a termination signal arrives.
///
/// `notify_one` stores a permit, so a signal that lands before the server
/// loop starts waiting is not lost.
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(name) => {
                logger::log_info(&format!("{name} received, initiating graceful shutdown"));
                shutdown.notify_one();
            }
            Err(e) => logger::log_error(&format!("Failed to register signal handlers: {e}")),
        }
    });
}
