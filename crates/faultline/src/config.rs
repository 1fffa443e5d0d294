//! Logger configuration
//!
//! [`LoggerConfig`] holds the collaborators (storage and auth adapters) and
//! the tunables. [`LoggerOptions`] is the serializable subset, so the
//! tunables can come from a settings file and be merged over the defaults.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use faultline_core::{AuthAdapter, LogAdapter, LogLevel};
use serde::{Deserialize, Serialize};

/// Days of history callers are expected to keep
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Environment variable selecting the runtime [`Environment`]
pub const ENVIRONMENT_VAR: &str = "FAULTLINE_ENV";

/// Runtime environment of the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

impl Environment {
    /// Read [`ENVIRONMENT_VAR`], defaulting to production when unset or
    /// unrecognised
    pub fn from_env() -> Self {
        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Serializable logger tunables; unset fields keep their defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerOptions {
    pub retention_days: Option<u32>,
    pub levels: Option<Vec<LogLevel>>,
    pub console_in_dev: Option<bool>,
    pub environment: Option<Environment>,
}

/// Everything an [`ErrorLogger`](crate::ErrorLogger) needs to record entries
#[derive(Clone)]
pub struct LoggerConfig {
    pub adapter: Arc<dyn LogAdapter>,
    pub auth_adapter: Option<Arc<dyn AuthAdapter>>,
    /// Stored for callers; nothing in this crate deletes entries
    pub retention_days: u32,
    /// Allow-list of levels to record; `None` records every level
    pub levels: Option<Vec<LogLevel>>,
    /// Mirror entries to the console in development
    pub console_in_dev: bool,
    pub environment: Environment,
}

impl LoggerConfig {
    /// Defaults around `adapter`, environment read from [`ENVIRONMENT_VAR`]
    pub fn new(adapter: Arc<dyn LogAdapter>) -> Self {
        Self {
            adapter,
            auth_adapter: None,
            retention_days: DEFAULT_RETENTION_DAYS,
            levels: None,
            console_in_dev: true,
            environment: Environment::from_env(),
        }
    }

    /// Defaults merged under `options`
    pub fn from_options(adapter: Arc<dyn LogAdapter>, options: LoggerOptions) -> Self {
        let defaults = Self::new(adapter);
        Self {
            retention_days: options.retention_days.unwrap_or(defaults.retention_days),
            levels: options.levels.or(defaults.levels),
            console_in_dev: options.console_in_dev.unwrap_or(defaults.console_in_dev),
            environment: options.environment.unwrap_or(defaults.environment),
            ..defaults
        }
    }

    pub fn with_auth_adapter(mut self, auth_adapter: Arc<dyn AuthAdapter>) -> Self {
        self.auth_adapter = Some(auth_adapter);
        self
    }

    pub fn with_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.levels = Some(levels.into_iter().collect());
        self
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_console_in_dev(mut self, enabled: bool) -> Self {
        self.console_in_dev = enabled;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Whether entries at `level` are recorded
    pub fn allows(&self, level: LogLevel) -> bool {
        self.levels
            .as_ref()
            .is_none_or(|levels| levels.contains(&level))
    }

    pub fn mirrors_to_console(&self) -> bool {
        self.console_in_dev && self.environment.is_development()
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("auth_adapter", &self.auth_adapter.is_some())
            .field("retention_days", &self.retention_days)
            .field("levels", &self.levels)
            .field("console_in_dev", &self.console_in_dev)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_storage::InMemoryLogAdapter;

    fn adapter() -> Arc<dyn LogAdapter> {
        Arc::new(InMemoryLogAdapter::new())
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::new(adapter()).with_environment(Environment::Production);
        assert_eq!(config.retention_days, 30);
        assert!(config.console_in_dev);
        assert!(config.levels.is_none());
        assert!(config.allows(LogLevel::Debug));
        assert!(!config.mirrors_to_console());
    }

    #[test]
    fn test_options_override_defaults() {
        let options: LoggerOptions = toml::from_str(
            r#"
            retentionDays = 7
            levels = ["error", "warn"]
            environment = "development"
            "#,
        )
        .unwrap();

        let config = LoggerConfig::from_options(adapter(), options);
        assert_eq!(config.retention_days, 7);
        assert!(config.console_in_dev);
        assert!(config.mirrors_to_console());
        assert!(config.allows(LogLevel::Warn));
        assert!(!config.allows(LogLevel::Info));
    }

    #[test]
    fn test_parse_environment() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }
}
