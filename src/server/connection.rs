// Connection handling module
// Serves one accepted TCP connection on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Spawn a task driving HTTP/1.1 (keep-alive on) over `stream`.
///
/// Each request gets its own clone of the shared state; nothing in it is
/// written after startup.
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&state), peer_addr)
        });

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
