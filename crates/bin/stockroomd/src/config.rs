//! Layered configuration: TOML file, then environment variables, then
//! command-line flags.
//!
//! Looks for `stockroom.toml` in the working directory unless `--config`
//! names another file. Every field has a sensible default so the file is
//! optional. Later layers take precedence over earlier ones.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "stockroom.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Storage backend selection.
    pub storage: StorageConfig,
    /// Photo directory settings.
    pub photos: PhotosConfig,
    /// Relational backend settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

/// Which [`DeviceRepository`](stockroom_app::ports::DeviceRepository) backs the service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local store, lost on restart.
    #[default]
    Memory,
    /// `SQLite` database through sqlx.
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unknown storage backend {other:?}, expected \"memory\" or \"sqlite\""
            ))),
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// Photo directory configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhotosConfig {
    /// Directory holding uploaded photos. Created when missing.
    pub dir: PathBuf,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL.
    pub url: String,
    /// Pause between two startup connection attempts, in seconds.
    pub retry_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the TOML file (if present), then apply
    /// environment-variable and command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file is malformed, if a file named with
    /// `--config` cannot be read, if an environment variable holds an
    /// unusable value, or if the result fails validation.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path, true)?,
            None => Self::from_file(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.apply_cli_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("STOCKROOM_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("STOCKROOM_PORT") {
            self.server.port = parse_port("STOCKROOM_PORT", &val)?;
        }
        if let Some(val) = lookup("STOCKROOM_BIND") {
            let Some((host, port)) = val.rsplit_once(':') else {
                return Err(ConfigError::Validation(format!(
                    "STOCKROOM_BIND must be host:port, got {val:?}"
                )));
            };
            self.server.host = host.to_string();
            self.server.port = parse_port("STOCKROOM_BIND", port)?;
        }
        if let Some(val) = lookup("STOCKROOM_CACHE") {
            self.photos.dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("STOCKROOM_STORAGE") {
            self.storage.backend = val.parse()?;
        }
        if let Some(val) = lookup("STOCKROOM_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("STOCKROOM_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(cache) = &cli.cache {
            self.photos.dir.clone_from(cache);
        }
        if let Some(backend) = cli.storage {
            self.storage.backend = backend;
        }
        if let Some(url) = &cli.database_url {
            self.database.url.clone_from(url);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.retry_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "database retry interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Pause between two startup connection attempts.
    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.database.retry_interval_secs)
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} holds an invalid port {value:?}")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: stockroom_adapter_http_axum::router::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cache"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:stockroom.db?mode=rwc".to_string(),
            retry_interval_secs: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "stockroomd=info,stockroom=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.photos.dir, PathBuf::from("cache"));
        assert_eq!(config.database.url, "sqlite:stockroom.db?mode=rwc");
        assert_eq!(config.retry_interval(), Duration::from_secs(2));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090
            max_upload_bytes = 1024

            [storage]
            backend = 'sqlite'

            [photos]
            dir = '/var/cache/stockroom'

            [database]
            url = 'sqlite:test.db'
            retry_interval_secs = 5

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.max_upload_bytes, 1024);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.photos.dir, PathBuf::from("/var/cache/stockroom"));
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.database.retry_interval_secs, 5);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_backend_in_toml() {
        let result: Result<Config, _> = toml::from_str("[storage]\nbackend = 'mongo'");
        assert!(result.is_err());
    }

    #[test]
    fn should_return_default_when_optional_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml"), false).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn should_fail_when_required_file_not_found() {
        let result = Config::from_file(Path::new("nonexistent.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn should_read_toml_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockroom.toml");
        std::fs::write(&path, "[photos]\ndir = 'uploads'\n").unwrap();

        let config = Config::from_file(&path, true).unwrap();

        assert_eq!(config.photos.dir, PathBuf::from("uploads"));
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("STOCKROOM_HOST", "127.0.0.1"),
                ("STOCKROOM_PORT", "8081"),
                ("STOCKROOM_CACHE", "/tmp/photos"),
                ("STOCKROOM_STORAGE", "sqlite"),
                ("STOCKROOM_DATABASE_URL", "sqlite:env.db"),
                ("STOCKROOM_LOG", "warn"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8081");
        assert_eq!(config.photos.dir, PathBuf::from("/tmp/photos"));
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.database.url, "sqlite:env.db");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_prefer_bind_over_host_and_port() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("STOCKROOM_HOST", "127.0.0.1"),
                ("STOCKROOM_PORT", "8081"),
                ("STOCKROOM_BIND", "10.0.0.1:7000"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr(), "10.0.0.1:7000");
    }

    #[test]
    fn should_prefer_rust_log_over_stockroom_log() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[("STOCKROOM_LOG", "warn"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_reject_invalid_env_port() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(env(&[("STOCKROOM_PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_bind_without_port() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(env(&[("STOCKROOM_BIND", "localhost")]));
        assert!(result.is_err());
    }

    #[test]
    fn should_let_cli_win_over_env() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("STOCKROOM_PORT", "8081"),
                ("STOCKROOM_STORAGE", "sqlite"),
            ]))
            .unwrap();
        let cli = Cli {
            port: Some(9000),
            storage: Some(StorageBackend::Memory),
            cache: Some(PathBuf::from("/srv/photos")),
            ..Cli::default()
        };

        config.apply_cli_overrides(&cli);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.photos.dir, PathBuf::from("/srv/photos"));
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_retry_interval() {
        let mut config = Config::default();
        config.database.retry_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_parse_backend_names_case_insensitively() {
        assert_eq!("SQLite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!(" memory ".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("mongo".parse::<StorageBackend>().is_err());
    }
}
