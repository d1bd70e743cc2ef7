#![cfg(test)]
use configs::DatabaseConfig;
use models::db::connect_and_migrate;
use sea_orm::DatabaseConnection;

/// A private, fully migrated in-memory database per call.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    connect_and_migrate(&DatabaseConfig::from_url("sqlite::memory:")).await
}
