//! Per-call context with distributed tracing correlation

use super::value::Field;
use serde::{Deserialize, Serialize};

/// Tracing context for distributed tracing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingContext {
    /// Trace ID for request correlation
    pub trace_id: String,

    /// Span ID for this operation
    pub span_id: String,

    /// Parent span ID (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
}

impl TracingContext {
    /// Create a new tracing context
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            parent_span_id: None,
        }
    }

    /// Set parent span ID
    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }
}

/// Context passed to every structured logging call
///
/// Logging never waits on or observes the context; it only reads correlation
/// ids from it, emitted as top-level `trace_id`, `span_id` and
/// `parent_span_id` fields.
///
/// # Example
///
/// ```
/// use rust_structlog::{Context, TracingContext};
///
/// let ctx = Context::background()
///     .with_tracing(TracingContext::new("trace-abc", "span-1"));
/// assert!(ctx.tracing().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    tracing: Option<TracingContext>,
}

impl Context {
    /// Empty context
    pub fn background() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tracing(mut self, tracing: TracingContext) -> Self {
        self.tracing = Some(tracing);
        self
    }

    pub fn tracing(&self) -> Option<&TracingContext> {
        self.tracing.as_ref()
    }

    pub(crate) fn correlation_fields(&self) -> Vec<Field> {
        let Some(tracing) = &self.tracing else {
            return Vec::new();
        };

        let mut fields = vec![
            Field::new("trace_id", tracing.trace_id.as_str()),
            Field::new("span_id", tracing.span_id.as_str()),
        ];
        if let Some(parent) = &tracing.parent_span_id {
            fields.push(Field::new("parent_span_id", parent.as_str()));
        }
        fields
    }
}
