//! Appender trait for log output destinations

use super::{error::Result, log_level::LogLevel};

/// A sink receiving rendered records
///
/// `record` is one complete rendered line, terminated by `\n`. Implementations
/// should write it with a single call so that a record is never split.
pub trait Appender: Send + Sync {
    fn append(&mut self, level: LogLevel, record: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
