//! File logging example
//!
//! Demonstrates JSON output to a file, with the config loaded from JSON.
//!
//! Run with: cargo run --example file_logging

use rust_structlog::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== rust_structlog - File Logging Example ===\n");

    let config: LoggerConfig = serde_json::from_str(r#"{"verbose": true, "format": "json"}"#)?;
    let logger = Logger::builder()
        .config(config)
        .appender(FileAppender::new("application.log")?)
        .timestamp_format(TimestampFormat::Rfc3339Micros)
        .build();
    let ctx = Context::background();

    println!("1. Logging application lifecycle to application.log");
    let app = logger.with(fields!["service", "billing", "version", "1.4.2"]);
    app.print(&ctx, "Application started", fields![]);
    app.print(&ctx, "Configuration loaded", fields!["source", "env"]);
    app.error(&ctx, "Failed to load optional plugin", fields!["plugin", "geoip"]);

    println!("2. Logging a batch job inside a group");
    let job = app.with_group("job").with(fields!["name", "invoices"]);
    for i in 1..=5 {
        job.print(
            &ctx,
            "Processing item",
            fields!["item", i, "of", 5, "elapsed", Duration::from_millis(40 * i)],
        );
    }

    println!("3. Redacted credentials");
    app.print(
        &ctx,
        "Connected to database",
        fields!["dsn", Secret::new("postgres://user:pass@db")],
    );

    logger.flush()?;
    println!("\n=== Example completed! Check application.log ===");
    Ok(())
}
