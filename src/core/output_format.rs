//! Output format configuration for log entries
//!
//! Provides the two output formats for log entries:
//! - Text: Human-readable single line with `key=value` fields
//! - Json: One JSON object per line

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use super::value::{Field, Value};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `INFO 2025-01-08T10:30:45.123Z Request processed id=1 path=/metrics`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example:
    /// `{"time":"2025-01-08T10:30:45.123Z","level":"INFO","msg":"Request processed","id":1}`
    Json,
}

/// Renders entries into complete, newline-terminated records
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
    pub use_colors: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Render one record, including the trailing newline. Never fails.
    pub fn render(&self, entry: &LogEntry) -> String {
        let mut record = match self.format {
            OutputFormat::Text => self.format_text(entry),
            OutputFormat::Json => self.format_json(entry),
        };
        record.push('\n');
        record
    }

    /// Format as human-readable text
    fn format_text(&self, entry: &LogEntry) -> String {
        let mut line = String::with_capacity(128);
        let _ = write!(
            line,
            "{} {} {}",
            self.level_label(entry),
            self.timestamp_format.format(&entry.timestamp),
            escape_message(&entry.message)
        );

        for field in entry.fields() {
            write_text_field(&mut line, "", field);
        }

        line
    }

    #[cfg(feature = "console")]
    fn level_label(&self, entry: &LogEntry) -> String {
        use colored::Colorize;

        if self.use_colors {
            entry
                .level
                .to_str()
                .color(entry.level.color_code())
                .to_string()
        } else {
            entry.level.to_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_label(&self, entry: &LogEntry) -> String {
        entry.level.to_str().to_string()
    }

    /// Format as JSON, degrading to a minimal record if serialization fails
    fn format_json(&self, entry: &LogEntry) -> String {
        match self.try_format_json(entry) {
            Ok(json) => json,
            Err(e) => serde_json::json!({
                "time": self.timestamp_format.to_json_value(&entry.timestamp),
                "level": entry.level.to_str(),
                "msg": entry.message,
                "!RENDER_ERROR": e.to_string(),
            })
            .to_string(),
        }
    }

    pub fn try_format_json(&self, entry: &LogEntry) -> Result<String> {
        let record = JsonRecord {
            time: self.timestamp_format.to_json_value(&entry.timestamp),
            entry,
        };
        Ok(serde_json::to_string(&record)?)
    }
}

/// Fixed header `time`, `level`, `msg` followed by the fields in order
struct JsonRecord<'a> {
    time: serde_json::Value,
    entry: &'a LogEntry,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("time", &self.time)?;
        map.serialize_entry("level", self.entry.level.to_str())?;
        map.serialize_entry("msg", &self.entry.message)?;
        for field in self.entry.fields() {
            if !field.value.is_empty_group() {
                map.serialize_entry(&field.key, &field.value)?;
            }
        }
        map.end()
    }
}

/// Append ` key=value`, flattening groups into dotted keys
fn write_text_field(line: &mut String, prefix: &str, field: &Field) {
    if let Value::Group(inner) = &field.value {
        let nested_prefix = format!("{}{}.", prefix, field.key);
        for nested in inner {
            write_text_field(line, &nested_prefix, nested);
        }
        return;
    }

    line.push(' ');
    line.push_str(&escape_key(prefix));
    line.push_str(&escape_key(&field.key));
    line.push('=');
    line.push_str(&escape_value(&field.value.to_string()));
}

/// Keys never contain whitespace, control characters, `=` or quotes
fn escape_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_whitespace() || c.is_control() || c == '=' || c == '"' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Quote a value if it is empty or contains whitespace, quotes, `=` or control chars
fn escape_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control());

    if needs_quotes {
        quote_value(value)
    } else {
        value.to_string()
    }
}

fn quote_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            c => push_char_escaped(&mut quoted, c),
        }
    }
    quoted.push('"');
    quoted
}

/// Text-mode message: one line, no raw control characters
fn escape_message(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for c in message.chars() {
        push_char_escaped(&mut escaped, c);
    }
    escaped
}

/// Push `c`, escaping line breaks, tabs and any other control character
fn push_char_escaped(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => {
            let _ = write!(out, "\\u{{{:x}}}", c as u32);
        }
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::value::Secret;
    use std::time::Duration;

    fn entry_with(fields: Vec<Field>) -> LogEntry {
        LogEntry::new(LogLevel::Info, "User logged in").with_fields(fields)
    }

    #[test]
    fn test_text_format_shape() {
        let entry = entry_with(vec![Field::new("user_id", 123), Field::new("action", "login")]);
        let line = Renderer::new(OutputFormat::Text).render(&entry);

        assert!(line.starts_with("INFO "));
        assert!(line.ends_with(" User logged in user_id=123 action=login\n"));
    }

    #[test]
    fn test_text_format_quotes_whitespace() {
        let entry = entry_with(vec![
            Field::new("query", "SELECT * FROM users WHERE id=1"),
            Field::new("empty", ""),
            Field::new("path", "/metrics"),
        ]);
        let line = Renderer::new(OutputFormat::Text).render(&entry);

        assert!(line.contains(r#"query="SELECT * FROM users WHERE id=1""#));
        assert!(line.contains(r#"empty="""#));
        assert!(line.contains("path=/metrics"));
    }

    #[test]
    fn test_text_format_escapes_newlines_in_values() {
        let entry = entry_with(vec![Field::new("note", "a\nb")]);
        let line = Renderer::new(OutputFormat::Text).render(&entry);

        assert_eq!(line.lines().count(), 1);
        assert!(line.contains(r#"note="a\nb""#));
    }

    #[test]
    fn test_text_format_escapes_terminal_sequences() {
        let entry = LogEntry::new(LogLevel::Info, "msg\u{1b}[31mFAKE\nERROR forged")
            .with_fields(vec![
                Field::new("k", "a\u{1b}[2Jb"),
                Field::new("bell\u{7}", "x"),
            ]);
        let line = Renderer::new(OutputFormat::Text).render(&entry);

        assert!(!line.contains('\u{1b}'));
        assert!(!line.contains('\u{7}'));
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains(r"msg\u{1b}[31mFAKE\nERROR forged"));
        assert!(line.contains(r#"k="a\u{1b}[2Jb""#));
        assert!(line.contains(" bell_=x"));
    }

    #[test]
    fn test_json_message_verbatim() {
        let message = "line1\nline2\tx\u{1b}[0m";
        let entry = LogEntry::new(LogLevel::Info, message);
        let line = Renderer::new(OutputFormat::Json).render(&entry);
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();

        assert_eq!(line.matches('\n').count(), 1);
        assert_eq!(parsed["msg"], message);
    }

    #[test]
    fn test_text_format_groups_prefix_keys() {
        let entry = entry_with(vec![
            Field::new("x", 0),
            Field::group("g", vec![Field::new("x", 1)]),
        ]);
        let line = Renderer::new(OutputFormat::Text).render(&entry);

        assert!(line.contains(" x=0"));
        assert!(line.contains(" g.x=1"));
    }

    #[test]
    fn test_text_format_duration() {
        let entry = entry_with(vec![Field::new("duration", Duration::from_millis(1500))]);
        let line = Renderer::new(OutputFormat::Text).render(&entry);
        assert!(line.contains("duration=1.5s"));
    }

    #[test]
    fn test_json_format_shape() {
        let entry = LogEntry::new(LogLevel::Error, "Error occurred")
            .with_fields(vec![Field::new("request_id", "abc-123"), Field::new("latency_ms", 42)]);
        let line = Renderer::new(OutputFormat::Json).render(&entry);

        assert!(line.starts_with(r#"{"time":"#));
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["msg"], "Error occurred");
        assert_eq!(parsed["request_id"], "abc-123");
        assert_eq!(parsed["latency_ms"], 42);
        assert!(parsed["time"].is_string());
    }

    #[test]
    fn test_json_format_nests_groups() {
        let entry = entry_with(vec![
            Field::new("x", 0),
            Field::group("g", vec![Field::new("x", 1)]),
            Field::group("empty", Vec::new()),
        ]);
        let line = Renderer::new(OutputFormat::Json).render(&entry);
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();

        assert_eq!(parsed["x"], 0);
        assert_eq!(parsed["g"]["x"], 1);
        assert!(parsed.get("empty").is_none());
    }

    #[test]
    fn test_json_format_non_finite_float() {
        let entry = entry_with(vec![Field::new("ratio", f64::INFINITY)]);
        let line = Renderer::new(OutputFormat::Json).render(&entry);
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();

        assert_eq!(parsed["ratio"], "inf");
    }

    #[test]
    fn test_redacted_in_both_formats() {
        let entry = entry_with(vec![Field::new("token", Secret::new("Secret-Token-Value"))]);

        for format in [OutputFormat::Text, OutputFormat::Json] {
            let line = Renderer::new(format).render(&entry);
            assert!(!line.contains("Secret-Token-Value"));
            assert!(line.contains("[REDACTED]"));
        }
    }

    #[test]
    fn test_colors_only_when_enabled() {
        let entry = entry_with(Vec::new());
        let plain = Renderer::new(OutputFormat::Text).render(&entry);
        assert!(!plain.contains('\u{1b}'));
    }

    #[test]
    fn test_output_format_serde() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
