// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::spawn_connection;
use super::signal::shutdown_signal;
use crate::config::AppState;
use crate::logger;

/// Accept loop.
///
/// Returns once SIGINT or SIGTERM is received. Accept errors are logged and
/// the loop keeps going.
pub async fn run(listener: TcpListener, state: Arc<AppState>) {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        spawn_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            reason = &mut shutdown => {
                logger::log_shutdown(reason);
                return;
            }
        }
    }
}
