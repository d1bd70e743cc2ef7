use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            api_prefix: default_api_prefix(),
        }
    }
}

fn default_api_prefix() -> String { "/api/v1".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Local SQLite file used when neither config nor `DATABASE_URL` names a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://city_services.db?mode=rwc";

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Which backend holds the city service records. Products always use the database.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local list; ids restart from 1 on every boot.
    #[default]
    Memory,
    /// Relational table through SeaORM.
    Database,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "database" | "db" => Ok(StorageBackend::Database),
            other => Err(anyhow!("unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Per-listener queue depth; a listener that falls this far behind is dropped.
    #[serde(default = "default_listener_buffer")]
    pub listener_buffer: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self { listener_buffer: default_listener_buffer() }
    }
}

fn default_listener_buffer() -> usize { 64 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content).map_err(|e| anyhow!("{path}: {e}"))?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or `config.toml`) and validate it. Only a missing
    /// file falls back to defaults plus environment overrides; a file that
    /// exists but cannot be read or parsed is an error.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::metadata(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            _ => load_from_file(path)?,
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server（环境变量优先于缺省值）
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.storage.normalize_from_env()?;
        // products 始终落库，因此无论 storage.backend 如何都需要可用的 database.url
        self.database.normalize_from_env();
        self.database.validate()?;
        if self.notifier.listener_buffer == 0 {
            return Err(anyhow!("notifier.listener_buffer must be >= 1"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        let prefix = self.api_prefix.trim().trim_end_matches('/');
        self.api_prefix = if prefix.is_empty() {
            String::new()
        } else if prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        Ok(())
    }
}

impl StorageConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var("STORAGE_BACKEND") {
            self.backend = v.parse()?;
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Build a config from `DATABASE_URL` alone, keeping pool defaults.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }

    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充，最后回落到本地 SQLite 文件
        if self.url.trim().is_empty() {
            self.url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.trim().to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            api_prefix = "v2/"

            [database]
            url = "sqlite://data/city.db?mode=rwc"

            [storage]
            backend = "database"

            [notifier]
            listener_buffer = 8

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.storage.backend, StorageBackend::Database);
        assert_eq!(cfg.notifier.listener_buffer, 8);
        assert_eq!(cfg.logging.format, "json");
        assert!(cfg.database.is_sqlite());
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn defaults_are_memory_backed() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.server.api_prefix, "/api/v1");
        assert_eq!(cfg.notifier.listener_buffer, 64);
    }

    #[test]
    fn normalizes_api_prefix() {
        let mut s = ServerConfig { api_prefix: "v2/".into(), ..ServerConfig::default() };
        s.normalize().unwrap();
        assert_eq!(s.api_prefix, "/v2");

        let mut s = ServerConfig { api_prefix: "/".into(), ..ServerConfig::default() };
        s.normalize().unwrap();
        assert_eq!(s.api_prefix, "");
    }

    #[test]
    fn rejects_port_zero() {
        let mut s = ServerConfig { port: 0, ..ServerConfig::default() };
        assert!(s.normalize().is_err());
    }

    #[test]
    fn database_validation() {
        assert!(DatabaseConfig::from_url("").validate().is_err());
        assert!(DatabaseConfig::from_url("mysql://x").validate().is_err());
        assert!(DatabaseConfig::from_url("postgres://u:p@localhost/db").validate().is_ok());
        assert!(DatabaseConfig::from_url("sqlite::memory:").validate().is_ok());

        let mut c = DatabaseConfig::from_url("sqlite::memory:");
        c.max_connections = 0;
        assert!(c.validate().is_err());
    }

    fn temp_config(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("city-services-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let path = temp_config("malformed", "[server]\nport = \"not-a-number\"\n[storage]\nbackend = \"database\"\n");
        let res = AppConfig::load_or_env_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(res.is_err());
    }

    #[test]
    fn config_file_values_are_kept() {
        let path = temp_config(
            "valid",
            "[server]\nhost = \"127.0.0.1\"\nport = 9100\n[database]\nurl = \"sqlite::memory:\"\n[storage]\nbackend = \"database\"\n",
        );
        let res = AppConfig::load_or_env_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        let cfg = res.unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Database);
        assert_eq!(cfg.database.url, "sqlite::memory:");
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("city-services-does-not-exist.toml");
        let cfg = AppConfig::load_or_env_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.api_prefix, "/api/v1");
    }

    #[test]
    fn storage_backend_from_str() {
        assert_eq!("DB".parse::<StorageBackend>().unwrap(), StorageBackend::Database);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
    }
}
