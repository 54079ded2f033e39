//! Macros for building field lists and formatted messages.
//!
//! # Examples
//!
//! ```
//! use rust_structlog::prelude::*;
//!
//! let logger = Logger::new(true, false);
//! let ctx = Context::background();
//!
//! // Key-value pairs and standalone fields may be mixed
//! logger.print(&ctx, "modes", fields!["id", 1, Field::new("managerMode", "v1")]);
//!
//! // Legacy formatted messages
//! printf!(logger, "listening on port {}", 2112);
//! ```

/// Build a field list from key-value pairs and [`Field`](crate::Field)s.
///
/// Each element is converted with [`Arg::from`](crate::Arg), then paired
/// when the list is emitted.
///
/// # Examples
///
/// ```
/// use rust_structlog::{fields, Arg};
///
/// let none: Vec<Arg> = fields![];
/// let some = fields!["rows", 5, "ok", true];
/// assert_eq!(none.len(), 0);
/// assert_eq!(some.len(), 4);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Emit a formatted info message through [`Logger::printf`](crate::Logger::printf).
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::new(true, false);
/// printf!(
///     logger,
///     "check metrics url={} test={:?}",
///     "http://localhost:2112/metrics",
///     "legacy mode"
/// );
/// ```
#[macro_export]
macro_rules! printf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.printf(::std::format_args!($($arg)+))
    };
}

/// Emit a formatted error message through [`Logger::errorf`](crate::Logger::errorf).
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::new(false, false);
/// errorf!(logger, "err={}", "address in use");
/// ```
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::std::format_args!($($arg)+))
    };
}
