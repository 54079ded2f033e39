//! Console appender implementation

use crate::core::{Appender, LogLevel, Result};
use std::io::{self, Write};

/// Which standard stream receives records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Warn and Error to stderr, everything else to stdout
    #[default]
    Split,
    Stdout,
    Stderr,
}

pub struct ConsoleAppender {
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            target: ConsoleTarget::default(),
        }
    }

    /// Pin every record to one stream
    ///
    /// # Example
    ///
    /// ```
    /// use rust_structlog::appenders::{ConsoleAppender, ConsoleTarget};
    ///
    /// let appender = ConsoleAppender::new().with_target(ConsoleTarget::Stderr);
    /// ```
    #[must_use]
    pub fn with_target(mut self, target: ConsoleTarget) -> Self {
        self.target = target;
        self
    }

    fn uses_stderr(&self, level: LogLevel) -> bool {
        match self.target {
            ConsoleTarget::Split => level >= LogLevel::Warn,
            ConsoleTarget::Stdout => false,
            ConsoleTarget::Stderr => true,
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, level: LogLevel, record: &str) -> Result<()> {
        if self.uses_stderr(level) {
            io::stderr().lock().write_all(record.as_bytes())?;
        } else {
            io::stdout().lock().write_all(record.as_bytes())?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
