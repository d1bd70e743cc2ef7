use std::sync::Arc;

use axum::Router;
use configs::DatabaseConfig;
use service::{
    city_service::CityServiceStore,
    notifier::ChangeNotifier,
    product::{ProductService, SeaOrmProductRepository},
};

use server::{startup::build_app, state::AppState};

/// Fresh state: in-memory city services, products on a migrated `sqlite::memory:`.
pub async fn test_state() -> anyhow::Result<AppState> {
    let db = models::db::connect_and_migrate(&DatabaseConfig::from_url("sqlite::memory:")).await?;
    let products = ProductService::new(Arc::new(SeaOrmProductRepository { db }));
    Ok(AppState::new(
        CityServiceStore::in_memory(),
        products,
        Arc::new(ChangeNotifier::new(16)),
        "/api/v1",
    ))
}

#[allow(dead_code)]
pub async fn test_app() -> anyhow::Result<Router> {
    Ok(build_app(test_state().await?))
}
