//! Main logger implementation

use super::{
    appender::Appender,
    context::Context,
    error::{LoggerError, Result},
    field_set::FieldSet,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::{OutputFormat, Renderer},
    timestamp::TimestampFormat,
    value::{pair_args, Arg, Field, Value},
};
use crate::appenders::ConsoleAppender;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::IsTerminal;
use std::sync::{Arc, OnceLock};

/// Write failures are reported on the first one and then once per this many
const FAILURE_REPORT_INTERVAL: u64 = 1000;

/// Development or production behavior preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Debug level on the handle, short timestamps, colors on a terminal
    Development,
    #[default]
    Production,
}

/// Construction-time configuration; immutable for the logger's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// When false, `print`/`printf` are no-ops; errors are always emitted
    pub verbose: bool,
    pub format: OutputFormat,
    pub mode: Mode,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            format: OutputFormat::Text,
            mode: Mode::Production,
        }
    }
}

impl LoggerConfig {
    /// Minimum level accepted by the low-level [`Handle`]
    pub fn min_level(&self) -> LogLevel {
        match (self.mode, self.verbose) {
            (Mode::Development, _) => LogLevel::Debug,
            (Mode::Production, true) => LogLevel::Info,
            (Mode::Production, false) => LogLevel::Warn,
        }
    }
}

/// State shared by a root logger and everything derived from it
struct Shared {
    config: LoggerConfig,
    renderer: Renderer,
    sink: Mutex<Box<dyn Appender>>,
    metrics: LoggerMetrics,
}

impl Shared {
    fn emit(&self, level: LogLevel, message: &str, fields: Vec<Field>) {
        let entry = LogEntry::new(level, message).with_fields(fields);
        if entry.redaction_failures() > 0 {
            let previous = self
                .metrics
                .record_redaction_failures(entry.redaction_failures());
            if previous == 0 {
                // The projection's error is not printed; it may describe the secret
                eprintln!("[LOGGER WARNING] Redaction projection failed; placeholder rendered");
            }
        }

        let record = self.renderer.render(&entry);
        self.metrics.record_emitted();

        let mut sink = self.sink.lock();
        if let Err(e) = sink.append(level, &record) {
            let previous = self.metrics.record_write_failure();
            if previous == 0 || (previous + 1) % FAILURE_REPORT_INTERVAL == 0 {
                eprintln!(
                    "[LOGGER ERROR] Appender '{}' failed ({} failures so far): {}",
                    sink.name(),
                    previous + 1,
                    e
                );
            }
        }
    }

    fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Err(e) = self.sink.get_mut().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Leveled structured logger facade
///
/// Cloning is cheap. Loggers derived with [`Logger::with`] and
/// [`Logger::with_group`] share the sink, config and metrics of their root.
///
/// # Example
///
/// ```
/// use rust_structlog::appenders::MemoryAppender;
/// use rust_structlog::{fields, Context, Logger};
///
/// let capture = MemoryAppender::new();
/// let logger = Logger::builder().verbose(true).appender(capture.clone()).build();
/// let ctx = Context::background();
///
/// let lg = logger.with(fields!["id", 1]);
/// lg.print(&ctx, "sample finished", fields!["rows", 123]);
///
/// assert!(capture.contents().contains("sample finished id=1 rows=123"));
/// ```
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    fields: Arc<FieldSet>,
}

impl Logger {
    /// Production logger writing to the console
    #[must_use]
    pub fn new(verbose: bool, json: bool) -> Self {
        Self::builder().verbose(verbose).json(json).build()
    }

    /// Development preset: text, verbose, debug-enabled handle, colors on a terminal
    #[must_use]
    pub fn new_dev() -> Self {
        Self::builder()
            .verbose(true)
            .format(OutputFormat::Text)
            .mode(Mode::Development)
            .build()
    }

    #[must_use]
    pub fn from_config(config: LoggerConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Emit an info event; does nothing when the logger is not verbose
    pub fn print(
        &self,
        ctx: &Context,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        if !self.shared.config.verbose {
            self.shared.metrics.record_suppressed();
            return;
        }
        self.emit_structured(ctx, LogLevel::Info, message.as_ref(), fields);
    }

    /// Emit an error event regardless of verbosity
    pub fn error(
        &self,
        ctx: &Context,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        self.emit_structured(ctx, LogLevel::Error, message.as_ref(), fields);
    }

    /// Emit a preformatted info message with no fields; see [`printf!`](crate::printf)
    ///
    /// Neither call-site nor bound fields are attached. Arguments are
    /// formatted with `Display`, so only values whose `Display` is already
    /// redacted (such as [`Secret`](crate::Secret)) stay hidden.
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        if !self.shared.config.verbose {
            self.shared.metrics.record_suppressed();
            return;
        }
        self.shared.emit(LogLevel::Info, &args.to_string(), Vec::new());
    }

    /// Emit a preformatted error message with no fields; see [`errorf!`](crate::errorf)
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.shared.emit(LogLevel::Error, &args.to_string(), Vec::new());
    }

    /// One call for both outcomes of an operation
    ///
    /// With an error, emits an error event carrying only `err=<description>`
    /// and drops `fields`. Without one, behaves like [`Logger::print`].
    ///
    /// ```
    /// use rust_structlog::appenders::MemoryAppender;
    /// use rust_structlog::{fields, Context, Logger};
    ///
    /// let capture = MemoryAppender::new();
    /// let logger = Logger::builder().appender(capture.clone()).build();
    /// let ctx = Context::background();
    ///
    /// let failure = std::io::Error::new(std::io::ErrorKind::Other, "random err");
    /// logger.print_or_err(&ctx, "sample finished", Some(&failure), fields!["rows", 0]);
    /// logger.print_or_err(&ctx, "sample finished", None, fields!["rows", 123]);
    ///
    /// let lines = capture.lines();
    /// assert!(lines[0].starts_with("ERROR") && lines[0].ends_with(r#"err="random err""#));
    /// assert!(lines[1].starts_with("INFO") && lines[1].ends_with("rows=123"));
    /// ```
    pub fn print_or_err(
        &self,
        ctx: &Context,
        message: impl AsRef<str>,
        err: Option<&dyn std::error::Error>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        match err {
            Some(err) => {
                let err_field = Field::new("err", Value::error(err));
                self.error(ctx, message, [Arg::Field(err_field)])
            }
            None => self.print(ctx, message, fields),
        }
    }

    /// Derive a logger carrying additional fields
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Arg>) -> Logger {
        Logger {
            shared: Arc::clone(&self.shared),
            fields: Arc::new(self.fields.with(pair_args(fields))),
        }
    }

    /// Derive a logger whose later fields nest under `name`
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Logger {
        Logger {
            shared: Arc::clone(&self.shared),
            fields: Arc::new(self.fields.with_group(name)),
        }
    }

    /// Low-level leveled handle for third-party integration
    #[must_use]
    pub fn handle(&self) -> Handle {
        Handle {
            logger: self.clone(),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.shared.config
    }

    pub fn is_verbose(&self) -> bool {
        self.shared.config.verbose
    }

    /// Counters shared with every logger derived from the same root
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.shared.flush()
    }

    fn emit_structured(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        let mut merged = ctx.correlation_fields();
        merged.extend(self.fields.merge(pair_args(fields)));
        self.shared.emit(level, message, merged);
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_structlog::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .verbose(false)
    ///     .json(true)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.shared.config)
            .field("groups", &self.fields.group_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Low-level leveled logging handle
///
/// Unlike the facade, the handle exposes every level and gates them by the
/// minimum level derived from [`LoggerConfig::min_level`]. It implements
/// [`log::Log`], so it can be installed as the `log` crate's logger.
#[derive(Clone)]
pub struct Handle {
    logger: Logger,
}

impl Handle {
    pub fn min_level(&self) -> LogLevel {
        self.logger.shared.config.min_level()
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    pub fn emit(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        if !self.is_enabled(level) {
            self.logger.shared.metrics.record_suppressed();
            return;
        }
        self.logger.emit_structured(ctx, level, message.as_ref(), fields);
    }

    pub fn debug(
        &self,
        ctx: &Context,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        self.emit(ctx, LogLevel::Debug, message, fields);
    }

    pub fn info(
        &self,
        ctx: &Context,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        self.emit(ctx, LogLevel::Info, message, fields);
    }

    pub fn warn(
        &self,
        ctx: &Context,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        self.emit(ctx, LogLevel::Warn, message, fields);
    }

    pub fn error(
        &self,
        ctx: &Context,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Arg>,
    ) {
        self.emit(ctx, LogLevel::Error, message, fields);
    }

    /// The facade this handle was taken from
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("min_level", &self.min_level())
            .finish()
    }
}

impl log::Log for Handle {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.is_enabled(LogLevel::from_log(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let message = record.args().to_string();
        self.emit(
            &Context::background(),
            LogLevel::from_log(record.level()),
            message,
            [Arg::Field(Field::new("target", record.target()))],
        );
    }

    fn flush(&self) {
        let _ = self.logger.flush();
    }
}

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Register `logger` as the process-wide default
///
/// This is the one sanctioned global: call it once at startup, before
/// spawning threads that log. It also installs the logger's [`Handle`] as
/// the `log` crate's logger, so `log::info!` and friends reach the same sink.
///
/// Returns [`LoggerError::AlreadyInitialized`] on a second call, and an
/// invalid configuration error if another `log` implementation was installed
/// first (the default is still registered in that case).
pub fn set_default(logger: &Logger) -> Result<()> {
    DEFAULT_LOGGER
        .set(logger.clone())
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    let handle = logger.handle();
    let max_level = handle.min_level().to_level_filter();
    log::set_boxed_logger(Box::new(handle))
        .map_err(|e| LoggerError::config("log", e.to_string()))?;
    log::set_max_level(max_level);
    Ok(())
}

/// The logger registered with [`set_default`], if any
pub fn default_logger() -> Option<&'static Logger> {
    DEFAULT_LOGGER.get()
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_structlog::prelude::*;
///
/// let logger = Logger::builder()
///     .verbose(true)
///     .format(OutputFormat::Json)
///     .appender(ConsoleAppender::new())
///     .timestamp_format(TimestampFormat::Rfc3339Micros)
///     .build();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    appender: Option<Box<dyn Appender>>,
    timestamp_format: Option<TimestampFormat>,
    use_colors: Option<bool>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            appender: None,
            timestamp_format: None,
            use_colors: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Shorthand for choosing between JSON and text output
    #[must_use = "builder methods return a new value"]
    pub fn json(mut self, json: bool) -> Self {
        self.config.format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the sink; defaults to a [`ConsoleAppender`]
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_appender(mut self, appender: Box<dyn Appender>) -> Self {
        self.appender = Some(appender);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Force colored level labels on or off in text output
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.use_colors = Some(use_colors);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let development = self.config.mode == Mode::Development;
        let text = self.config.format == OutputFormat::Text;

        // Colors by default only for the console sink, and only on a terminal
        let use_colors = self.use_colors.unwrap_or(
            development && text && self.appender.is_none() && std::io::stdout().is_terminal(),
        );
        let timestamp_format = self.timestamp_format.unwrap_or(if development && text {
            TimestampFormat::TimeOnly
        } else {
            TimestampFormat::Rfc3339
        });
        let appender = self
            .appender
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));

        let renderer = Renderer::new(self.config.format)
            .with_timestamp_format(timestamp_format)
            .with_colors(use_colors && text);

        Logger {
            shared: Arc::new(Shared {
                config: self.config,
                renderer,
                sink: Mutex::new(appender),
                metrics: LoggerMetrics::new(),
            }),
            fields: Arc::new(FieldSet::new()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
