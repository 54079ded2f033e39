//! Basic logger usage example
//!
//! Demonstrates the print/error facade, derived loggers, groups,
//! redaction and the process-wide default.
//!
//! Run with: cargo run --example basic_usage -- [--quiet] [--json] [--dev]

use rust_structlog::prelude::*;
use rust_structlog::set_default;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// API token that never appears in output
struct Token(&'static str);

impl Redact for Token {
    fn redacted_render(&self) -> Result<Value> {
        Ok(Value::from("REDACTED_TOKEN"))
    }
}

#[derive(Clone, Copy)]
enum ManagerMode {
    V1,
    V2,
}

impl ManagerMode {
    fn field(self) -> Field {
        let name = match self {
            ManagerMode::V1 => "v1",
            ManagerMode::V2 => "v2",
        };
        Field::new("managerMode", name)
    }
}

/// Component that carries its own logger
struct MyManager {
    logger: Logger,
}

impl MyManager {
    fn new(logger: Logger) -> Self {
        Self { logger }
    }

    fn run(&self, ctx: &Context) {
        self.logger.print(ctx, "test run to stdout", fields![]);
        self.logger.error(ctx, "test run failed", fields!["err", "const err"]);
    }

    fn report_all_modes(&self, ctx: &Context) {
        self.logger
            .print(ctx, "modes", fields![ManagerMode::V1.field(), ManagerMode::V2.field()]);
    }

    /// Logs the outcome with a single call whichever way it went
    fn sample(&self, ctx: &Context) {
        let lg = self.logger.with(fields!["id", 1]);

        let coin = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() % 2)
            .unwrap_or(0);
        let (rows, failure) = if coin == 1 {
            (0, Some(std::io::Error::new(std::io::ErrorKind::Other, "random err")))
        } else {
            (123, None)
        };

        lg.print_or_err(
            ctx,
            "sample finished",
            failure.as_ref().map(|e| e as &dyn std::error::Error),
            fields!["rows", rows],
        );
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = !args.iter().any(|a| a == "--quiet");
    let json = args.iter().any(|a| a == "--json");
    let ctx = Context::background();

    let logger = if args.iter().any(|a| a == "--dev") {
        Logger::new_dev()
    } else {
        Logger::new(verbose, json)
    };
    set_default(&logger)?;

    let background = std::thread::spawn(move || {
        let l3 = Logger::new(verbose, json);
        let token = Value::redacted(Token("Secret"));
        l3.print(&Context::background(), "l3 test", fields!["token", token]);
    });

    let manager = MyManager::new(logger.clone());
    manager.run(&ctx);
    manager.sample(&ctx);

    // Library code on the log facade lands in the same output
    log::info!("this is default logger");

    let l2 = logger.with(fields!["verbose", verbose, "isJSON", json, ManagerMode::V2.field()]);
    MyManager::new(l2.clone()).run(&ctx);
    manager.report_all_modes(&ctx);

    printf!(
        logger,
        "check metrics url={} test={:?}",
        "http://localhost:2112/metrics",
        "legacy mode"
    );

    logger
        .with(fields!["p1", true])
        .print(&ctx, "test l1 with", fields![ManagerMode::V1.field()]);
    l2.with_group("l2")
        .print(&ctx, "test l2 group", fields!["v2", true, Field::new("test", true)]);

    logger.handle().debug(&ctx, "SELECT 1", fields!["duration", Duration::from_millis(3)]);
    errorf!(logger, "err={}", "listener closed");

    if background.join().is_err() {
        logger.error(&ctx, "background logger panicked", fields![]);
    }
    logger.flush()
}
