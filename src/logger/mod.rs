//! Logger module
//!
//! Startup, warning and fatal error lines plus optional per-request access
//! logging, written to stdout/stderr or to configured files.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::config::Config;
use crate::slides::SlideSource;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_fatal(message: &str) {
    write_error(&format!("[FATAL] {message}"));
}

pub fn log_slides_ready(source: SlideSource, count: usize, slides_file: &str) {
    write_info(&format!(
        "[Slides] Loaded {count} slides from {} ({slides_file})",
        source.as_str()
    ));
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info(&format!("Server starting on port {}...", addr.port()));
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Static files: {}", config.paths.static_dir));
    write_info(&format!("Images: {}", config.paths.images_dir));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("[Shutdown] {reason} received, stopping server"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
