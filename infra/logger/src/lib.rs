//! # Logger
//!
//! `tracing` bootstrap for processes that embed the engine.
//! Console output goes to **stderr** so that tools printing results on stdout
//! (the CLI prints JSON) stay machine-readable. File output uses a rolling,
//! non-blocking appender, optionally as JSON lines.
//!
//! Two entry points:
//! * [`Logger::builder`] for programmatic setup.
//! * [`Logger::from_settings`] for a [`LogSettings`] section read from a config file.
//!
//! Use [`LoggerBuilder::env_filter`] for per-module directives
//! (e.g., `"tessera_resolver=trace,tessera_domains=debug"`); `RUST_LOG` is honoured
//! when no explicit filter is set.
//!
//! ## Example
//!
//! ```rust
//! # use tessera_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("tessera")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;
mod settings;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use crate::settings::{LogSettings, RotationPolicy};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    ansi: bool,
    targets: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            ansi: true,
            targets: false,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

impl LoggerConfig {
    fn validate(&self, name: &str) -> Result<(), LoggerError> {
        if name.trim().is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }
        if self.max_files == 0 {
            return Err(invalid("max_files must be greater than zero"));
        }
        if !self.console && self.path.is_none() {
            return Err(invalid("No logging layers enabled. Enable console or file output."));
        }
        Ok(())
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            None => Ok(builder.from_env_lossy()),
            Some(filter) => builder
                .parse(filter)
                .map_err(|e| invalid(format!("Invalid env filter '{filter}': {e}"))),
        }
    }

    fn console_layer<S>(&self) -> BoxedLayer<S>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        layer()
            .compact()
            .with_writer(io::stderr)
            .with_ansi(self.ansi)
            .with_target(self.targets)
            .boxed()
    }

    fn file_layer<S>(&self, name: &str, dir: &Path) -> Result<(BoxedLayer<S>, WorkerGuard), LoggerError>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        fs::create_dir_all(dir).map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(format!("Failed to create path: {}", dir.display()).into()),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(name)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.max_files)
            .build(dir)
            .context("Rolling file appender")?;

        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file_layer = layer().with_writer(writer).with_ansi(false);
        let boxed = if self.json { file_layer.json().boxed() } else { file_layer.boxed() };
        Ok((boxed, guard))
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// Builder for the global tracing subscriber.
///
/// A name is required before `init`; file-only knobs (rotation, retention,
/// JSON) become available once a path is set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Names the process; also the prefix of rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { name: WithName(name.into()), config: self.config, file_state: PhantomData }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Number of rotated files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes the file layer as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self) -> Self {
        self.config.json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Default level when no filter directive matches.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Explicit filter directives. Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables the stderr console layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Colours on the console layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.config.ansi = enabled;
        self
    }

    /// Prints module targets (`tessera_resolver::resolver`) next to each line.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn targets(mut self, enabled: bool) -> Self {
        self.config.targets = enabled;
        self
    }

    /// Directory for rolling log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive: it owns the file worker guard and
    /// pending lines are flushed when it drops.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero retention,
    ///   a bad filter or no enabled layer.
    /// * [`LoggerError::Appender`] / [`LoggerError::Internal`] when the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { config, name: WithName(name), .. } = self;
        config.validate(&name)?;

        let env_filter = config.env_filter()?;
        let mut layers = Vec::new();

        if config.console {
            layers.push(config.console_layer());
        }

        let guard = match &config.path {
            Some(dir) => {
                let (file_layer, guard) = config.file_layer(&name, dir)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// Handle to the initialized logging system.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts a new [`LoggerBuilder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use tessera_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("tessera")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName, file_state: PhantomData }
    }

    /// Initializes from a config-file section; `level` overrides `settings.level` when set.
    ///
    /// # Errors
    /// Same as [`LoggerBuilder::init`], plus an unknown level name.
    pub fn from_settings(
        name: &str,
        settings: &LogSettings,
        level: Option<&str>,
    ) -> Result<Self, LoggerError> {
        let level = level.or(settings.level.as_deref()).map(parse_level).transpose()?;

        let mut builder = Self::builder()
            .name(name)
            .level(level.unwrap_or(LevelFilter::INFO))
            .console(settings.console)
            .ansi(settings.ansi);
        if let Some(filter) = &settings.filter {
            builder = builder.env_filter(filter.clone());
        }

        let Some(dir) = &settings.path else {
            return builder.init();
        };
        let builder = builder.path(dir).rotation(settings.rotation.into()).max_files(settings.max_files);
        if settings.json { builder.json().init() } else { builder.init() }
    }

    /// Whether a file worker is attached.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing buffers");
        }
    }
}

/// Parses a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`), case-insensitively.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse::<LevelFilter>().map_err(|e| invalid(format!("Unknown log level '{level}': {e}")))
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("tessera").env_filter("tessera_resolver=debug");
        assert!(builder.config.console);
        assert!(builder.config.ansi);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("tessera_resolver=debug"));
        assert!(builder.config.path.is_none());
    }

    #[test]
    fn file_settings_follow_path() {
        let tmp_dir = tempdir().unwrap();
        let log_dir = tmp_dir.path().join("logs");
        let builder = Logger::builder()
            .name("tessera")
            .ansi(false)
            .path(log_dir.clone())
            .max_files(5)
            .rotation(Rotation::HOURLY)
            .json()
            .level(LevelFilter::DEBUG);

        assert!(!builder.config.ansi);
        assert!(builder.config.json);
        assert_eq!(builder.config.max_files, 5);
        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(builder.config.path.as_deref(), Some(log_dir.as_path()));
    }

    #[test]
    #[serial]
    fn rejects_empty_name_and_zero_retention() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert_eq!(err.kind(), "invalid-configuration");

        let tmp_dir = tempdir().unwrap();
        let err = Logger::builder().name("tessera").path(tmp_dir.path()).max_files(0).init().unwrap_err();
        assert!(err.to_string().contains("max_files"));
    }

    #[test]
    #[serial]
    fn rejects_bad_filter_and_no_layers() {
        let err = Logger::builder().name("tessera").env_filter("tessera=[[").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("tessera").console(false).init().unwrap_err();
        assert!(err.to_string().contains("No logging layers"));
    }

    #[test]
    #[serial]
    fn settings_reject_unknown_level_before_installing() {
        let settings = LogSettings { level: Some("chatty".to_owned()), ..LogSettings::default() };
        let err = Logger::from_settings("tessera", &settings, None).unwrap_err();
        assert!(err.to_string().contains("chatty"));

        let err = Logger::from_settings("tessera", &LogSettings::default(), Some("loud")).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn parses_level_names() {
        assert_eq!(parse_level("TRACE").unwrap(), LevelFilter::TRACE);
        assert_eq!(parse_level(" warn ").unwrap(), LevelFilter::WARN);
        assert!(parse_level("chatty").is_err());
    }
}
