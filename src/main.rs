use std::process::ExitCode;
use std::sync::Arc;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod server;
mod slides;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Slides are settled before any connection is accepted
    let (store, source) = slides::load_or_derive(&cfg.paths)
        .map_err(|e| format!("Failed to load slides: {e}"))?;
    logger::log_slides_ready(source, store.len(), &cfg.paths.slides_file);
    if store.is_empty() {
        logger::log_warning(&format!("{} holds no slides", cfg.paths.slides_file));
    }

    // Create Tokio runtime, worker count from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let state = Arc::new(config::AppState::new(cfg, store));
    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<config::AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.get_socket_addr()?;
    let listener = server::create_listener(addr)
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    logger::log_server_start(&addr, &state.config);
    server::run(listener, state).await;
    Ok(())
}
