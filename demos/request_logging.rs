//! Request logging example
//!
//! A request-timing middleware around plain handler functions, plus a
//! query hook that logs through the low-level handle at debug level.
//!
//! Run with: cargo run --example request_logging -- [--dev]

use rust_structlog::prelude::*;
use std::time::{Duration, Instant};

/// Bearer token shown only in redacted form
struct Token(String);

impl Redact for Token {
    fn redacted_render(&self) -> Result<Value> {
        Ok(Value::from("REDACTED_TOKEN"))
    }
}

struct Request {
    method: &'static str,
    path: &'static str,
    token: String,
    trace: TracingContext,
}

type Handler = fn(&Request) -> u16;

/// Times `next` and logs one record per request
fn logging_middleware(logger: Logger, next: Handler) -> impl Fn(Request) -> u16 {
    move |req: Request| {
        let start = Instant::now();
        let status = next(&req);
        let ctx = Context::background().with_tracing(req.trace.clone());

        logger.print(
            &ctx,
            "HTTP request",
            fields![
                "method", req.method,
                "path", req.path,
                "status", status,
                "duration", start.elapsed(),
                "token", Value::redacted(Token(req.token))
            ],
        );
        status
    }
}

/// Logs executed queries at debug level with their RPC method
struct QueryLogger {
    handle: Handle,
}

impl QueryLogger {
    fn new(logger: &Logger) -> Self {
        Self {
            handle: logger.handle(),
        }
    }

    fn after_query(&self, ctx: &Context, rpc: &str, query: &str, took: Duration) {
        self.handle.debug(ctx, query, fields!["rpc", rpc, "duration", took]);
    }
}

fn metrics(_req: &Request) -> u16 {
    200
}

fn users(_req: &Request) -> u16 {
    std::thread::sleep(Duration::from_millis(5));
    404
}

fn main() {
    let dev = std::env::args().any(|a| a == "--dev");
    let logger = if dev {
        Logger::new_dev()
    } else {
        Logger::new(true, true)
    };

    let serve_metrics = logging_middleware(logger.clone(), metrics);
    let serve_users = logging_middleware(logger.with_group("api"), users);

    serve_metrics(Request {
        method: "GET",
        path: "/metrics",
        token: "Secret".to_string(),
        trace: TracingContext::new("4bf92f3577b34da6", "00f067aa0ba902b7"),
    });
    serve_users(Request {
        method: "POST",
        path: "/users/42",
        token: "Secret".to_string(),
        trace: TracingContext::new("4bf92f3577b34da6", "53995c3f42cd8ad8")
            .with_parent("00f067aa0ba902b7"),
    });

    // Visible only with --dev, where the handle accepts debug records
    let queries = QueryLogger::new(&logger);
    queries.after_query(
        &Context::background(),
        "user.get",
        "SELECT * FROM users WHERE id = 42",
        Duration::from_millis(3),
    );

    println!("{:?}", logger.metrics());
}
