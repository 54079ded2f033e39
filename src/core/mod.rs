//! Core logger types and traits

pub mod appender;
pub mod context;
pub mod error;
pub mod field_set;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod timestamp;
pub mod value;

pub use appender::Appender;
pub use context::{Context, TracingContext};
pub use error::{LoggerError, Result};
pub use field_set::FieldSet;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{default_logger, set_default, Handle, Logger, LoggerBuilder, LoggerConfig, Mode};
pub use metrics::LoggerMetrics;
pub use output_format::{OutputFormat, Renderer};
pub use timestamp::TimestampFormat;
pub use value::{pair_args, Arg, Field, Redact, Secret, Value, BAD_KEY, MISSING, REDACTED};
