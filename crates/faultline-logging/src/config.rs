//! Subscriber settings, loadable from the `[logging]` table of a config file

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Targets that drown out the server's own events at debug level
const NOISY_TARGETS: &[(&str, &str)] = &[("hyper", "info"), ("sqlx", "warn"), ("redb", "warn")];

/// How events are rendered on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// Human-readable, multi-field lines
    Pretty,
    /// One JSON object per line
    #[default]
    Json,
    /// No console output
    Off,
}

/// How the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rollover {
    #[default]
    Daily,
    Hourly,
    /// A single file, truncated at startup
    Never,
}

/// Logging settings
///
/// All fields default, so `[logging]` may be partial or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base filter level; `RUST_LOG` replaces the whole filter when set
    pub level: String,
    pub console: ConsoleFormat,
    pub ansi: bool,
    pub file: Option<FileOutput>,
    pub json: JsonLines,
    /// Level per target, e.g. `tower_http = "debug"`
    pub targets: BTreeMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleFormat::Json,
            ansi: false,
            file: None,
            json: JsonLines::default(),
            targets: BTreeMap::new(),
        }
    }
}

impl LogConfig {
    /// Pretty colored console at debug, dependency chatter held back
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            console: ConsoleFormat::Pretty,
            ansi: true,
            ..Default::default()
        }
        .quiet_noisy_targets()
    }

    /// JSON lines to rolling files under `log_dir` only
    pub fn production(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            console: ConsoleFormat::Off,
            file: Some(FileOutput::new(log_dir)),
            ..Default::default()
        }
        .quiet_noisy_targets()
    }

    /// Warnings and above, plain console
    pub fn testing() -> Self {
        Self {
            level: "warn".to_string(),
            console: ConsoleFormat::Pretty,
            ..Default::default()
        }
    }

    /// Set `target` to `level`, replacing any earlier entry
    pub fn with_target(mut self, target: impl Into<String>, level: impl Into<String>) -> Self {
        self.targets.insert(target.into(), level.into());
        self
    }

    /// Add the default overrides for chatty dependencies; explicit entries win
    pub fn quiet_noisy_targets(mut self) -> Self {
        for (target, level) in NOISY_TARGETS {
            self.targets
                .entry((*target).to_string())
                .or_insert_with(|| (*level).to_string());
        }
        self
    }

    /// `EnvFilter` directive string
    pub fn directives(&self) -> String {
        std::iter::once(self.level.clone())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// JSON lines written to files in `directory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutput {
    pub directory: PathBuf,
    /// File name stem; rolled files get a date suffix
    pub name: String,
    pub rollover: Rollover,
    /// Oldest rolled files beyond this count are removed
    pub keep: Option<usize>,
}

impl FileOutput {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }
}

impl Default for FileOutput {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            name: "faultline".to_string(),
            rollover: Rollover::Daily,
            keep: Some(14),
        }
    }
}

/// Shape of each JSON line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonLines {
    /// Event fields at the top level instead of under `fields`
    pub flatten: bool,
    pub spans: bool,
    /// Source file and line
    pub location: bool,
}

impl Default for JsonLines {
    fn default() -> Self {
        Self {
            flatten: true,
            spans: true,
            location: false,
        }
    }
}
