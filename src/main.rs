use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod registry;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First argument overrides the config file location
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::Config::load_from(&path)?,
        None => config::Config::load()?,
    };

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    } else {
        println!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg)?;

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    let record_count = state.registry.read().await.list().len();
    logger::log_server_start(&addr, &cfg, record_count);

    server::signal::start_signal_handler(Arc::clone(&state.shutdown));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local.run_until(server::start_server_loop(listener, state)).await;

    Ok(())
}
