use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

mod cli;
mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;
mod storage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let cfg = config::Config::load(&cli)?;
    logger::init(&cfg)?;

    // The storage root is checked before anything is bound
    let state = match config::AppState::new(cfg) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            logger::log_error(&e.to_string());
            return Err(e.into());
        }
    };

    // Build the Tokio runtime, sized by `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<config::AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.get_socket_addr()?;
    let listener = server::create_listener(addr)
        .inspect_err(|e| logger::log_error(&format!("Failed to bind {addr}: {e}")))?;

    logger::log_server_start(&addr, &state.config);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    // LocalSet for spawn_local connection tasks
    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state, shutdown)).await;

    logger::log_info("Server stopped");
    Ok(())
}
