use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{errors::StartupError, routes, state::AppState};
use service::{
    city_service::{repo::seaorm::SeaOrmCityServiceRepository, CityServiceStore},
    notifier::ChangeNotifier,
    product::{ProductService, SeaOrmProductRepository},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Connect storage and assemble the shared state described by `cfg`.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    runtime::ensure_env(&cfg.database.url).await?;
    let db = models::db::connect_and_migrate(&cfg.database).await?;

    let services = match cfg.storage.backend {
        StorageBackend::Memory => CityServiceStore::in_memory(),
        StorageBackend::Database => CityServiceStore::new(Arc::new(SeaOrmCityServiceRepository::new(db.clone()))),
    };
    let products = ProductService::new(Arc::new(SeaOrmProductRepository { db }));
    let notifier = Arc::new(ChangeNotifier::new(cfg.notifier.listener_buffer));
    info!(backend = ?cfg.storage.backend, listener_buffer = cfg.notifier.listener_buffer, "storage ready");

    Ok(AppState::new(services, products, notifier, cfg.server.api_prefix.clone()))
}

/// Build the router for an already assembled state.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Run the HTTP server for an already validated config.
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await.map_err(|e| StartupError::Runtime(e.to_string()))?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    info!(%addr, api_prefix = %cfg.server.api_prefix, "starting city services server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Bind(addr.to_string(), e.to_string()))?;
    axum::serve(listener, app).await?;
    Ok(())
}
