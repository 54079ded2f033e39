//! Integration tests for the logger facade
//!
//! These tests verify:
//! - Verbose gating of print/printf
//! - Error/success logging through print_or_err
//! - Field ordering across derived loggers
//! - Group nesting in text and JSON output
//! - Redaction in both output formats
//! - File and injected-writer sinks

use rust_structlog::appenders::{FileAppender, MemoryAppender, WriterAppender};
use rust_structlog::{
    errorf, fields, printf, Context, Field, LogLevel, Logger, LoggerError, OutputFormat, Redact,
    Result, Secret, TimestampFormat, TracingContext, Value,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

type Token = &'static str;

/// Demo-style token whose projection hides the content
struct ApiToken(Token);

impl Redact for ApiToken {
    fn redacted_render(&self) -> Result<Value> {
        Ok(Value::from("REDACTED_TOKEN"))
    }
}

/// Projection that cannot produce a safe value
struct VaultBacked(Token);

impl Redact for VaultBacked {
    fn redacted_render(&self) -> Result<Value> {
        Err(LoggerError::redaction("vault unavailable"))
    }
}

fn capture(verbose: bool, json: bool) -> (Logger, MemoryAppender) {
    let capture = MemoryAppender::new();
    let logger = Logger::builder()
        .verbose(verbose)
        .json(json)
        .appender(capture.clone())
        .build();
    (logger, capture)
}

fn parse(line: &str) -> serde_json::Value {
    serde_json::from_str(line).expect("record should be valid JSON")
}

#[test]
fn test_quiet_logger_writes_nothing_for_print() {
    for json in [false, true] {
        let (logger, capture) = capture(false, json);
        let ctx = Context::background();

        logger.print(&ctx, "test run to stdout", fields!["k", "v"]);
        printf!(logger, "legacy {}", 1);
        logger.with(fields!["id", 1]).print(&ctx, "derived", fields![]);

        assert!(capture.is_empty(), "quiet logger must not touch the sink");
    }
}

#[test]
fn test_quiet_logger_still_writes_errors() {
    let (logger, capture) = capture(false, false);
    let ctx = Context::background();

    logger.error(&ctx, "test run failed", fields!["err", "const err"]);
    errorf!(logger, "err={}", "listen failed");

    let lines = capture.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ERROR "));
    assert!(lines[0].contains(r#"err="const err""#));
    assert!(lines[1].ends_with("err=listen failed"));
}

#[test]
fn test_text_line_shape() {
    let capture = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(capture.clone())
        .timestamp_format(TimestampFormat::Custom("%Y".to_string()))
        .build();

    logger.print(
        &Context::background(),
        "HTTP request",
        fields!["method", "GET", "path", "/metrics"],
    );

    let line = &capture.lines()[0];
    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    assert_eq!(parts[0], "INFO");
    assert_eq!(parts[1].len(), 4);
    assert_eq!(parts[2], "HTTP request method=GET path=/metrics");
}

#[test]
fn test_json_records_have_fixed_header() {
    let (logger, capture) = capture(true, true);
    let ctx = Context::background();

    logger.print(&ctx, "info", fields!["rows", 5]);
    logger.error(&ctx, "error", fields![]);
    logger.handle().debug(&ctx, "suppressed", fields![]);

    let lines = capture.lines();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert!(line.starts_with(r#"{"time":"#));
        let record = parse(line);
        assert!(record["time"].is_string());
        assert!(record["level"].is_string());
        assert!(record["msg"].is_string());
    }
    assert_eq!(parse(&lines[0])["level"], "INFO");
    assert_eq!(parse(&lines[0])["rows"], 5);
    assert_eq!(parse(&lines[1])["level"], "ERROR");
}

#[test]
fn test_json_time_is_rfc3339() {
    let (logger, capture) = capture(true, true);
    logger.print(&Context::background(), "stamped", fields![]);

    let record = parse(&capture.lines()[0]);
    let time = record["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
}

#[test]
fn test_with_chain_orders_fields() {
    let (logger, capture) = capture(true, false);
    let derived = logger.with(fields!["a", 1, "b", 2]).with(fields!["c", 3, "d", 4]);

    derived.print(&Context::background(), "first", fields![]);
    derived.print(&Context::background(), "second", fields!["e", 5]);

    let lines = capture.lines();
    assert!(lines[0].ends_with("first a=1 b=2 c=3 d=4"));
    assert!(lines[1].ends_with("second a=1 b=2 c=3 d=4 e=5"));
}

#[test]
fn test_parent_unchanged_by_derivation() {
    let (logger, capture) = capture(true, false);
    let parent = logger.with(fields!["id", 1]);
    let _child = parent.with(fields!["extra", true]).with_group("g");

    parent.print(&Context::background(), "parent", fields![]);
    assert!(capture.lines()[0].ends_with("parent id=1"));
}

#[test]
fn test_group_distinct_from_root_in_text() {
    let (logger, capture) = capture(true, false);
    logger
        .with(fields!["x", 0])
        .with_group("g")
        .with(fields!["x", 1])
        .print(&Context::background(), "grouped", fields!["y", 2]);

    assert!(capture.lines()[0].ends_with("grouped x=0 g.x=1 g.y=2"));
}

#[test]
fn test_group_distinct_from_root_in_json() {
    let (logger, capture) = capture(true, true);
    let l2 = logger.with(fields!["verbose", true, "isJSON", true, Field::new("managerMode", "v2")]);
    l2.with_group("l2")
        .print(
            &Context::background(),
            "test l2 group",
            fields!["v2", true, Field::new("test", true)],
        );

    let record = parse(&capture.lines()[0]);
    assert_eq!(record["managerMode"], "v2");
    assert_eq!(record["l2"]["v2"], true);
    assert_eq!(record["l2"]["test"], true);
    assert!(record.get("v2").is_none());
}

#[test]
fn test_group_without_fields_is_omitted() {
    let (logger, capture) = capture(true, true);
    logger.with_group("empty").print(&Context::background(), "nothing nested", fields![]);

    let record = parse(&capture.lines()[0]);
    assert!(record.get("empty").is_none());
}

#[test]
fn test_print_or_err_branches() {
    let (logger, capture) = capture(true, false);
    let ctx = Context::background();
    let lg = logger.with(fields!["id", 1]);

    lg.print_or_err(&ctx, "sample finished", None, fields!["rows", 5]);
    let err = std::io::Error::new(std::io::ErrorKind::Other, "random err");
    lg.print_or_err(&ctx, "sample finished", Some(&err), fields!["rows", 5]);

    let lines = capture.lines();
    assert!(lines[0].starts_with("INFO"));
    assert!(lines[0].ends_with("sample finished id=1 rows=5"));
    assert!(lines[1].starts_with("ERROR"));
    assert!(lines[1].ends_with(r#"sample finished id=1 err="random err""#));
}

#[test]
fn test_print_or_err_with_boxed_error() {
    let (logger, capture) = capture(true, true);
    let failure: Option<Box<dyn std::error::Error>> = Some("random err".into());

    logger.print_or_err(
        &Context::background(),
        "sample finished",
        failure.as_deref(),
        fields!["rows", 0],
    );

    let record = parse(&capture.lines()[0]);
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["err"], "random err");
    assert!(record.get("rows").is_none());
}

#[test]
fn test_redaction_in_both_formats() {
    for json in [false, true] {
        let (logger, capture) = capture(true, json);
        let ctx = Context::background();

        logger.print(&ctx, "l3 test", fields!["token", Value::redacted(ApiToken("Secret"))]);
        logger
            .with(fields!["password", Secret::new("hunter2")])
            .with_group("auth")
            .error(
                &ctx,
                "login failed",
                fields!["key", Value::redacted(VaultBacked("s3cr3t-key"))],
            );

        let contents = capture.contents();
        assert!(contents.contains("REDACTED_TOKEN"));
        assert!(!contents.contains("Secret"));
        assert!(!contents.contains("hunter2"));
        assert!(!contents.contains("s3cr3t-key"));
        assert_eq!(logger.metrics().redaction_failures(), 1);
    }
}

#[test]
fn test_secret_stays_hidden_through_printf() {
    let (logger, capture) = capture(true, false);
    printf!(logger, "connecting with password={}", Secret::new("hunter2"));

    assert!(!capture.contents().contains("hunter2"));
    assert!(capture.contents().contains("password=[REDACTED]"));
}

#[test]
fn test_typed_values_render() {
    let (logger, capture) = capture(true, true);
    logger.print(
        &Context::background(),
        "HTTP request",
        fields![
            "method", "GET",
            "duration", Duration::from_millis(250),
            "bytes", 1024_u64,
            "ratio", 0.5,
            "missing", None::<i32>
        ],
    );

    let record = parse(&capture.lines()[0]);
    assert_eq!(record["method"], "GET");
    assert_eq!(record["duration"], "250ms");
    assert_eq!(record["bytes"], 1024);
    assert_eq!(record["ratio"], 0.5);
    assert!(record["missing"].is_null());
}

#[test]
fn test_malformed_fields_degrade() {
    let (logger, capture) = capture(true, false);
    logger.print(&Context::background(), "malformed", fields![42, "rows", 5, "orphan"]);

    let line = &capture.lines()[0];
    assert!(line.contains("!BADKEY=42"));
    assert!(line.contains("rows=5"));
    assert!(line.contains("orphan=(MISSING)"));
}

#[test]
fn test_log_injection_prevention() {
    let (logger, capture) = capture(true, false);
    logger.print(
        &Context::background(),
        "User login\nERROR 2024-10-17 Fake error injected",
        fields!["note", "multi\nline"],
    );

    let contents = capture.contents();
    assert_eq!(contents.lines().count(), 1, "record must stay on one line");
    assert!(contents.contains("\\n"));
}

#[test]
fn test_json_message_matches_caller_message() {
    let (logger, capture) = capture(true, true);
    logger.print(&Context::background(), "line1\nline2\tx", fields![]);

    let record = parse(&capture.lines()[0]);
    assert_eq!(record["msg"], "line1\nline2\tx");
}

#[test]
fn test_terminal_escapes_neutralized_in_text() {
    let (logger, capture) = capture(true, false);
    logger.print(
        &Context::background(),
        "msg\u{1b}[31mFAKE",
        fields!["k", "a\u{1b}[2Jb"],
    );

    let line = &capture.lines()[0];
    assert!(!line.contains('\u{1b}'), "raw escape in {:?}", line);
    assert!(line.ends_with(r#"msg\u{1b}[31mFAKE k="a\u{1b}[2Jb""#));
}

/// Projection that panics with a message built from its content
struct Explosive(Token);

impl Redact for Explosive {
    fn redacted_render(&self) -> Result<Value> {
        panic!("cannot mask {}", self.0)
    }
}

#[test]
fn test_panicking_projection_payload_never_reaches_sink() {
    for json in [false, true] {
        let (logger, capture) = capture(true, json);
        logger.error(
            &Context::background(),
            "masking failed",
            fields!["tok", Value::redacted(Explosive("TOPSECRET"))],
        );

        let contents = capture.contents();
        assert_eq!(capture.len(), 1);
        assert!(!contents.contains("TOPSECRET"));
        assert!(!contents.contains("cannot mask"));
        assert!(contents.contains("[REDACTED]"));
        assert_eq!(logger.metrics().redaction_failures(), 1);
    }
}

#[test]
fn test_tracing_context_correlation() {
    let (logger, capture) = capture(true, true);
    let ctx = Context::background()
        .with_tracing(TracingContext::new("trace-abc", "span-2").with_parent("span-1"));

    logger.with(fields!["id", 1]).print(&ctx, "traced", fields![]);

    let record = parse(&capture.lines()[0]);
    assert_eq!(record["trace_id"], "trace-abc");
    assert_eq!(record["span_id"], "span-2");
    assert_eq!(record["parent_span_id"], "span-1");
    assert_eq!(record["id"], 1);
}

#[test]
fn test_handle_respects_levels() {
    let (logger, capture) = capture(true, false);
    let handle = logger.with(fields!["rpc", "user.get"]).handle();
    let ctx = Context::background();

    handle.debug(&ctx, "SELECT 1", fields!["duration", Duration::from_millis(3)]);
    handle.warn(&ctx, "slow query", fields![]);

    assert_eq!(capture.levels(), vec![LogLevel::Warn]);
    assert!(capture.lines()[0].ends_with("slow query rpc=user.get"));
}

#[test]
fn test_dev_mode_handle_emits_debug() {
    let capture = MemoryAppender::new();
    let logger = Logger::builder()
        .mode(rust_structlog::Mode::Development)
        .appender(capture.clone())
        .build();

    logger.handle().debug(&Context::background(), "SELECT 1", fields![]);
    assert_eq!(capture.levels(), vec![LogLevel::Debug]);
    assert!(!capture.contents().contains('\u{1b}'), "custom sinks default to no colors");
}

#[cfg(feature = "console")]
#[test]
fn test_forced_colors() {
    let capture = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(capture.clone())
        .colors(true)
        .build();

    colored::control::set_override(true);
    logger.error(&Context::background(), "colored", fields![]);
    colored::control::unset_override();

    assert!(capture.contents().contains('\u{1b}'));
}

#[test]
fn test_file_sink() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::builder()
        .json(true)
        .appender(FileAppender::new(&log_file)?)
        .build();

    for i in 0..5 {
        logger.print(&Context::background(), "iteration", fields!["i", i]);
    }
    logger.flush()?;

    let content = fs::read_to_string(&log_file)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(parse(line)["i"], i as i64);
    }
    Ok(())
}

#[test]
fn test_writer_sink_flushed_on_drop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let log_file = temp_dir.path().join("writer.log");

    {
        let file = fs::File::create(&log_file)?;
        let logger = Logger::builder()
            .appender(WriterAppender::new(std::io::BufWriter::new(file)))
            .build();
        logger.with(fields!["p1", true]).print(&Context::background(), "test l1 with", fields![]);
    }

    let content = fs::read_to_string(&log_file)?;
    assert!(content.contains("test l1 with p1=true"));
    Ok(())
}

#[test]
fn test_failing_sink_never_propagates() {
    let logger = Logger::builder()
        .appender(MemoryAppender::failing())
        .build();

    for _ in 0..3 {
        logger.error(&Context::background(), "closed output", fields![]);
    }
    assert_eq!(logger.metrics().write_failures(), 3);
}

#[test]
fn test_output_format_from_config() {
    let config: rust_structlog::LoggerConfig =
        serde_json::from_str(r#"{"verbose":false,"format":"json","mode":"production"}"#).unwrap();
    let capture = MemoryAppender::new();
    let logger = Logger::builder()
        .config(config)
        .appender(capture.clone())
        .build();

    assert_eq!(logger.config().format, OutputFormat::Json);
    logger.print(&Context::background(), "quiet", fields![]);
    logger.error(&Context::background(), "loud", fields![]);
    assert_eq!(capture.len(), 1);
}
