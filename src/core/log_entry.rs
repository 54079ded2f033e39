//! Log entry structure

use super::log_level::LogLevel;
use super::value::Field;
use chrono::{DateTime, Utc};

/// An immutable log event
///
/// Fields are resolved when attached: every redactable value has already been
/// replaced by its projection, so an entry never holds raw secret content.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    fields: Vec<Field>,
    redaction_failures: u64,
}

impl LogEntry {
    /// New entry stamped now; the message is kept as given
    ///
    /// Escaping for line-oriented output happens in the text renderer, so JSON
    /// carries the caller's message unchanged.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            fields: Vec::new(),
            redaction_failures: 0,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut failures = 0;
        self.fields.extend(
            fields
                .into_iter()
                .map(|field| field.resolve_counting(&mut failures)),
        );
        self.redaction_failures += failures;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of redaction projections that failed and were replaced by the placeholder
    pub fn redaction_failures(&self) -> u64 {
        self.redaction_failures
    }
}
