// Signal handling module
//
// - SIGTERM: stop
// - SIGINT:  stop (Ctrl+C)
//
// Non-Unix targets only get Ctrl+C.

use crate::logger;

/// Resolve with the name of the first termination signal received
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            None
        }
    };

    let term = async {
        match sigterm.as_mut() {
            Some(s) => {
                s.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        () = term => "SIGTERM",
        () = ctrl_c() => "SIGINT",
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    ctrl_c().await;
    "Ctrl+C"
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
