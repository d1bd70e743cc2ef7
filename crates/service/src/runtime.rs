//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Make sure the storage location behind `database_url` is usable.
pub async fn ensure_env(database_url: &str) -> anyhow::Result<()> {
    common::env::ensure_sqlite_parent(database_url).await
}
