//! Server settings: TOML file plus command-line overrides

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use faultline_logging::LogConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading server settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// CLI arguments for the server
#[derive(Parser, Debug, Default)]
#[command(name = "faultline-server")]
#[command(about = "HTTP API for querying and managing Faultline error logs")]
pub struct CliArgs {
    /// Path to a TOML settings file
    #[arg(short, long, env = "FAULTLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FAULTLINE_PORT")]
    pub port: Option<u16>,

    /// Path the logs API is mounted under
    #[arg(long)]
    pub base_path: Option<String>,

    /// Storage backend
    #[arg(long, value_enum)]
    pub backend: Option<StorageBackend>,

    /// Database file for the redb backend
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Connection URL for the sqlite backend
    #[arg(long)]
    pub database_url: Option<String>,

    /// Bearer token required on every API request
    #[arg(long, env = "FAULTLINE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Storage backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Redb,
    Sqlite,
}

/// Top-level settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub server: HttpSettings,
    pub storage: StorageSettings,
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
    pub base_path: String,
    /// When set, requests must carry `Authorization: Bearer <token>`
    pub api_token: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_path: "/api/logs".to_string(),
            api_token: None,
        }
    }
}

impl HttpSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// redb database file
    pub path: PathBuf,
    /// sqlx connection URL
    pub url: String,
    /// SQL table name
    pub table: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("faultline.redb"),
            url: "sqlite://faultline.db".to_string(),
            table: faultline_storage::DEFAULT_TABLE.to_string(),
        }
    }
}

impl ServerSettings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load the file named by `--config` (if any) and apply CLI overrides
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut settings = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(args);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(host) = &args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(base_path) = &args.base_path {
            self.server.base_path = base_path.clone();
        }
        if let Some(token) = &args.api_token {
            self.server.api_token = Some(token.clone());
        }
        if let Some(backend) = args.backend {
            self.storage.backend = backend;
        }
        if let Some(path) = &args.db_path {
            self.storage.path = path.clone();
        }
        if let Some(url) = &args.database_url {
            self.storage.url = url.clone();
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.api_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("api_token must not be empty".to_string()));
        }
        if self.storage.backend == StorageBackend::Sqlite && self.storage.url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.url is required for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = ServerSettings::from_toml(
            r#"
            [server]
            port = 9000

            [storage]
            backend = "redb"
            path = "/var/lib/faultline/logs.redb"

            [logging]
            level = "debug"
            "#,
            Path::new("faultline.toml"),
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.base_path, "/api/logs");
        assert_eq!(settings.storage.backend, StorageBackend::Redb);
        assert_eq!(settings.storage.table, "error_logs");
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut settings = ServerSettings::default();
        let args = CliArgs {
            port: Some(3000),
            backend: Some(StorageBackend::Sqlite),
            database_url: Some("sqlite::memory:".to_string()),
            api_token: Some("t0ken".to_string()),
            ..Default::default()
        };
        settings.apply_overrides(&args);

        assert_eq!(settings.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(settings.storage.backend, StorageBackend::Sqlite);
        assert_eq!(settings.storage.url, "sqlite::memory:");
        assert_eq!(settings.server.api_token.as_deref(), Some("t0ken"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let err =
            ServerSettings::from_toml("[storage]\nbackend = \"postgres\"", Path::new("x.toml"));
        assert!(matches!(err, Err(ConfigError::Parse { .. })));

        let mut settings = ServerSettings::default();
        settings.server.api_token = Some("  ".to_string());
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_cli_parses() {
        let args = CliArgs::try_parse_from([
            "faultline-server",
            "--port",
            "8181",
            "--backend",
            "redb",
            "--db-path",
            "/tmp/logs.redb",
        ])
        .unwrap();
        assert_eq!(args.port, Some(8181));
        assert_eq!(args.backend, Some(StorageBackend::Redb));
    }
}
