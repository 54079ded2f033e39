//! Error types for the structured logger
//!
//! None of these escape an emission call: write and redaction failures are
//! absorbed by the logger and surface only through [`LoggerMetrics`] and
//! stderr diagnostics. They are returned from construction, flushing,
//! registration and [`Redact`] projections.
//!
//! [`LoggerMetrics`]: crate::LoggerMetrics
//! [`Redact`]: crate::Redact

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO failure with the operation and target that caused it
    #[error("IO error while {operation} '{target}': {source}")]
    IoOperation {
        operation: String,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// A redaction projection could not produce its safe value
    #[error("Redaction failed: {0}")]
    RedactionError(String),

    /// The process-wide default logger was already registered
    #[error("Default logger already initialized")]
    AlreadyInitialized,
}

impl LoggerError {
    pub fn io_operation(
        operation: impl Into<String>,
        target: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            target: target.into(),
            source,
        }
    }

    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Error for a [`Redact`](crate::Redact) projection to return
    pub fn redaction(msg: impl Into<String>) -> Self {
        LoggerError::RedactionError(msg.into())
    }
}
