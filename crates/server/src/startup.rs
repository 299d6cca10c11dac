use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::store::{mongo, MongoCatalogRepository};
use service::{CatalogRepository, TokenService};

use crate::auth::AppState;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

/// Public entry: load config, connect the store, build the app, serve until
/// ctrl-c. An unreachable store aborts the process here; per-request store
/// failures later are handled by the API error path.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;

    let db = mongo::connect(&cfg.database.uri, &cfg.database.name).await?;
    let store: Arc<dyn CatalogRepository> = Arc::new(MongoCatalogRepository::new(&db));
    let tokens = Arc::new(TokenService::new(
        &cfg.auth.jwt_secret,
        chrono::Duration::seconds(cfg.auth.token_ttl_secs),
    ));
    let state = AppState { store, tokens };

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting kitchen api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
