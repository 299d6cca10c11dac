use dotenvy::dotenv;
use tracing::{error, info};

fn main() -> std::process::ExitCode {
    // Load .env before anything reads RUST_LOG or config overrides.
    dotenv().ok();
    common::utils::logging::init_logging();

    // Worker count from config.toml when present, else TOKIO_WORKER_THREADS.
    let worker_threads = configs::AppConfig::load_and_validate()
        .ok()
        .and_then(|cfg| cfg.server.worker_threads)
        .or_else(|| {
            std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok())
        });

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = worker_threads {
        builder.worker_threads(threads);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "kitchen api booting");

    // server::run owns the whole lifecycle, including ctrl-c shutdown; an
    // error here is a startup failure (bad config, unreachable store).
    match rt.block_on(server::run()) {
        Ok(()) => {
            info!("kitchen api stopped");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "kitchen api exited with error");
            std::process::ExitCode::FAILURE
        }
    }
}
