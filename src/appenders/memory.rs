//! In-memory appender for capturing output

use crate::core::{Appender, LogLevel, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Appender collecting records into a shared buffer
///
/// Clones share the same buffer, so a test can hand one clone to the logger
/// and read the output through another.
///
/// # Example
///
/// ```
/// use rust_structlog::appenders::MemoryAppender;
/// use rust_structlog::{fields, Context, Logger};
///
/// let capture = MemoryAppender::new();
/// let logger = Logger::builder()
///     .verbose(true)
///     .appender(capture.clone())
///     .build();
///
/// logger.print(&Context::background(), "hello", fields!["rows", 5]);
/// assert!(capture.contents().contains("rows=5"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Vec<(LogLevel, String)>>>,
    fail_writes: bool,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appender whose writes always fail, for exercising error paths
    pub fn failing() -> Self {
        Self {
            buffer: Arc::default(),
            fail_writes: true,
        }
    }

    /// All records concatenated
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .iter()
            .map(|(_, record)| record.as_str())
            .collect()
    }

    /// Records without their trailing newline
    pub fn lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .iter()
            .map(|(_, record)| record.trim_end_matches('\n').to_string())
            .collect()
    }

    pub fn levels(&self) -> Vec<LogLevel> {
        self.buffer.lock().iter().map(|(level, _)| *level).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, level: LogLevel, record: &str) -> Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed").into());
        }
        self.buffer.lock().push((level, record.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
