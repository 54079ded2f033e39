//! Appender over any injected writer

use crate::core::{Appender, LogLevel, Result};
use std::io::Write;

/// Writes records to an arbitrary `Write` implementation
///
/// # Example
///
/// ```
/// use rust_structlog::appenders::WriterAppender;
/// use rust_structlog::Logger;
///
/// let logger = Logger::builder()
///     .verbose(true)
///     .appender(WriterAppender::new(std::io::sink()))
///     .build();
/// ```
pub struct WriterAppender<W: Write + Send + Sync> {
    writer: W,
}

impl<W: Write + Send + Sync> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> Appender for WriterAppender<W> {
    fn append(&mut self, _level: LogLevel, record: &str) -> Result<()> {
        self.writer.write_all(record.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}
