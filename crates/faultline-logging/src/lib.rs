//! Tracing subscriber setup for Faultline binaries
//!
//! Library crates in this workspace only emit `tracing` events; the server
//! and dashboard binaries install a subscriber once at startup.
//!
//! ```ignore
//! use faultline_logging::{FaultlineSubscriberBuilder, LogConfig};
//!
//! // Hold the guard for the life of the process so file output is flushed
//! let _guard = FaultlineSubscriberBuilder::new()
//!     .with_config(LogConfig::production("/var/log/faultline"))
//!     .try_init()?;
//! ```

pub mod config;
pub mod error;

pub use config::{ConsoleFormat, FileOutput, JsonLines, LogConfig, Rollover};
pub use error::LoggingError;
pub use tracing_appender::non_blocking::WorkerGuard;

use std::fs::{self, File};

use tracing::Subscriber;
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{Format, Json, JsonFields};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds and installs the global subscriber from a [`LogConfig`]
#[derive(Debug, Clone, Default)]
pub struct FaultlineSubscriberBuilder {
    config: LogConfig,
}

impl FaultlineSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    pub fn with_console(mut self, format: ConsoleFormat) -> Self {
        self.config.console = format;
        self
    }

    pub fn with_file(mut self, output: FileOutput) -> Self {
        self.config.file = Some(output);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        let directives = self.config.directives();
        EnvFilter::try_new(&directives).map_err(|e| LoggingError::InvalidFilter {
            directives,
            reason: e.to_string(),
        })
    }

    /// Install as the global default
    ///
    /// With file output configured, the returned guard flushes the writer
    /// when dropped. A second call reports
    /// [`LoggingError::AlreadyInitialized`].
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let filter = self.env_filter()?;
        let LogConfig {
            console,
            ansi,
            file,
            json,
            ..
        } = self.config;

        let (file_layer, guard) = match file {
            Some(output) => {
                let (writer, guard) = file_writer(&output)?;
                (Some(json_layer(json, writer)), Some(guard))
            }
            None => (None, None),
        };
        let pretty = (console == ConsoleFormat::Pretty)
            .then(|| fmt::layer().with_ansi(ansi).with_target(true));
        let json_console =
            (console == ConsoleFormat::Json).then(|| json_layer(json, std::io::stdout));

        Registry::default()
            .with(filter)
            .with(pretty)
            .with(json_console)
            .with(file_layer)
            .try_init()
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

        Ok(guard)
    }
}

fn file_writer(output: &FileOutput) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&output.directory)?;

    let rotation = match output.rollover {
        Rollover::Never => {
            let file = File::create(output.directory.join(format!("{}.log", output.name)))?;
            return Ok(tracing_appender::non_blocking(file));
        }
        Rollover::Daily => Rotation::DAILY,
        Rollover::Hourly => Rotation::HOURLY,
    };

    let mut appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&output.name)
        .filename_suffix("log");
    if let Some(keep) = output.keep {
        appender = appender.max_log_files(keep);
    }
    let appender = appender
        .build(&output.directory)
        .map_err(|e| LoggingError::FileAppender(e.to_string()))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// JSON lines layer shaped by `fields`
pub fn json_layer<S, W>(fields: JsonLines, writer: W) -> fmt::Layer<S, JsonFields, Format<Json>, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    fmt::layer()
        .json()
        .with_current_span(fields.spans)
        .with_span_list(fields.spans)
        .flatten_event(fields.flatten)
        .with_file(fields.location)
        .with_line_number(fields.location)
        .with_writer(writer)
}

/// Pretty debug output, for the desktop dashboard and local runs
pub fn init_development() -> Result<(), LoggingError> {
    FaultlineSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .try_init()
        .map(|_| ())
}

/// Warn-level output for tests; later calls are no-ops
pub fn init_testing() {
    let _ = FaultlineSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_overrides() {
        let builder = FaultlineSubscriberBuilder::new()
            .with_level("trace")
            .with_console(ConsoleFormat::Off)
            .with_file(FileOutput::new("/tmp/faultline-logs"));
        assert_eq!(builder.config().level, "trace");
        assert_eq!(builder.config().console, ConsoleFormat::Off);
        assert!(builder.config().file.is_some());
    }

    #[test]
    fn test_single_file_writer_creates_file() {
        let temp = TempDir::new().unwrap();
        let output = FileOutput {
            directory: temp.path().join("nested"),
            name: "server".to_string(),
            rollover: Rollover::Never,
            keep: None,
        };

        let (_writer, _guard) = file_writer(&output).unwrap();
        assert!(temp.path().join("nested/server.log").exists());
    }

    #[test]
    fn test_second_init_reports_error() {
        init_testing();
        let result = FaultlineSubscriberBuilder::new()
            .with_config(LogConfig::testing())
            .try_init();
        assert!(matches!(result, Err(LoggingError::AlreadyInitialized(_))));
    }
}
