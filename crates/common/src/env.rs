//! Environment/runtime helpers
//!
//! Sanity checks to ensure the on-disk locations the server relies on exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the parent directory of a SQLite database file exists.
///
/// Non-sqlite URLs and in-memory databases are left alone.
pub async fn ensure_sqlite_parent(database_url: &str) -> anyhow::Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = rest.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        if tokio::fs::metadata(parent).await.is_err() {
            warn!(dir = %parent.display(), "sqlite data directory missing; creating it");
        }
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        info!(dir = %parent.display(), "sqlite data directory ready");
    }
    Ok(())
}
