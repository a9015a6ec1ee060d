//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for AutoIMS binaries:
//! a compact console layer, an optional rolling file layer (plain or JSON)
//! written through a non-blocking worker, and an [`EnvFilter`] that honours
//! `RUST_LOG` on top of the configured level.
//!
//! The builder is typestate-checked: [`LoggerBuilder::init`] needs a name, and
//! file knobs ([`LoggerBuilder::rotation`], [`LoggerBuilder::max_files`],
//! [`LoggerBuilder::json`]) only exist once [`LoggerBuilder::path`] was given.
//!
//! ```rust
//! # use autoims_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("autoims-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
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
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

/// Settings as they appear in a configuration file.
///
/// `level` is parsed with [`LevelFilter`]'s `FromStr` (`"info"`, `"debug"`, `"off"`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions<'a> {
    pub level: &'a str,
    pub directory: Option<&'a Path>,
    pub json: bool,
    pub filter: Option<&'a str>,
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

/// Configures and installs the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Names the logger; also the prefix of rolled log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { name: WithName(name.into()), config: self.config, file_state: PhantomData }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes the file layer as JSON lines. The console stays human-readable.
    #[must_use]
    pub const fn json(mut self) -> Self {
        self.config.json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds filter directives such as `autoims_customers=debug,tower_http=info`.
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Enables the rolling file layer under `path`.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: PhantomData }
    }

    /// Installs the subscriber.
    ///
    /// The returned [`Logger`] owns the file worker guard; keep it alive until shutdown.
    ///
    /// # Errors
    ///
    /// * [`LoggerError::Subscriber`] when a global subscriber is already set.
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, `max_files == 0`,
    ///   bad filter directives or no enabled layer.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] when the log directory is unusable.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let LoggerBuilder { config, name: WithName(name), .. } = self;
        validate_config(&config, &name)?;

        let env_filter = build_env_filter(&config)?;
        let mut layers = Vec::new();

        if config.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match &config.path {
            Some(path) => {
                std::fs::create_dir_all(path)
                    .context(format!("Failed to create {}", path.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(config.rotation.clone())
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(config.max_files)
                    .build(path)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if config.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::invalid("No logging layers enabled; enable console or file output"));
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// Handle to the installed logging system.
///
/// Dropping it flushes and stops the background file writer.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName, file_state: PhantomData }
    }

    /// Installs the subscriber from file-style settings.
    ///
    /// A `directory` enables the rolling file layer (daily rotation), with
    /// `json` selecting its format. The console layer is always on.
    ///
    /// # Errors
    ///
    /// Everything [`LoggerBuilder::init`] returns, plus
    /// [`LoggerError::InvalidConfiguration`] for an unknown level.
    pub fn from_options(name: impl Into<String>, options: LogOptions<'_>) -> Result<Self, LoggerError> {
        let level = parse_level(options.level)?;
        let mut builder = Self::builder().name(name).level(level);
        if let Some(filter) = options.filter.filter(|f| !f.trim().is_empty()) {
            builder = builder.env_filter(filter);
        }

        match options.directory {
            Some(dir) => {
                let builder = builder.path(dir);
                if options.json { builder.json().init() } else { builder.init() }
            },
            None => builder.init(),
        }
    }

    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers");
        }
    }
}

/// Parses a level name; an empty string means `info`.
///
/// # Errors
///
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    let level = level.trim();
    if level.is_empty() {
        return Ok(LevelFilter::INFO);
    }
    level.parse().map_err(|_| LoggerError::invalid(format!("Unknown log level '{level}'")))
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::invalid("Logger name cannot be empty"));
    }
    if config.max_files == 0 {
        return Err(LoggerError::invalid("max_files must be greater than zero"));
    }
    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        None => Ok(builder.from_env_lossy()),
        Some(filter) => builder
            .parse(filter)
            .map_err(|e| LoggerError::invalid(format!("Invalid env filter '{filter}': {e}"))),
    }
}
