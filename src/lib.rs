//! # Rust Structlog
//!
//! A leveled structured logger facade with verbose gating, field groups and
//! safe redaction of sensitive values.
//!
//! ## Features
//!
//! - **Verbose gating**: `print` is a no-op on quiet loggers, `error` always emits
//! - **Structured fields**: ordered key-value fields, derived loggers, groups
//! - **Redaction**: values implementing [`Redact`] are never rendered raw
//! - **Text or JSON**: one record per line, safe for concurrent writers
//! - **`log` interop**: install the facade as the `log` crate's logger
//!
//! ```
//! use rust_structlog::prelude::*;
//!
//! let logger = Logger::new(true, false);
//! let ctx = Context::background();
//!
//! logger.print(&ctx, "test run to stdout", fields!["token", Secret::new("hunter2")]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
    pub use crate::core::{
        Appender, Arg, Context, Field, Handle, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, Mode, OutputFormat, Redact, Result, Secret,
        TimestampFormat, TracingContext, Value,
    };
    pub use crate::{errorf, fields, printf};
}

pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
pub use crate::core::{
    default_logger, pair_args, set_default, Appender, Arg, Context, Field, FieldSet, Handle,
    LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Mode,
    OutputFormat, Redact, Renderer, Result, Secret, TimestampFormat, TracingContext, Value,
    BAD_KEY, MISSING, REDACTED,
};
