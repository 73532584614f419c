//! Logging macros for ergonomic log message formatting.
//!
//! Unlike the plain methods, the macros also record the enclosing function
//! as the `func` field. They work with a [`Logger`](crate::Logger), an
//! [`Entry`](crate::Entry), or the process-wide logger.
//!
//! # Examples
//!
//! ```
//! use husplus_logger::prelude::*;
//! use husplus_logger::{fields, info, warn};
//!
//! let logger = Logger::builder().output(std::io::sink()).build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! warn!(logger.with_fields(fields! { "attempt" => 3 }), "retrying");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use husplus_logger::prelude::*;
/// # let logger = Logger::builder().output(std::io::sink()).build();
/// use husplus_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $level,
            None,
            Some($crate::CallSite::new(
                Some($crate::__function_path!()),
                file!(),
                line!(),
            )),
            format_args!($($arg)+),
        )
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use husplus_logger::prelude::*;
/// # let logger = Logger::builder().output(std::io::sink()).build();
/// use husplus_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's exit handler.
///
/// # Examples
///
/// ```
/// # use husplus_logger::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Logger::builder()
/// #     .output(std::io::sink())
/// #     .exit_handler(Arc::new(|_| {}))
/// #     .build();
/// use husplus_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Build a [`Fields`](crate::Fields) map from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use husplus_logger::fields;
///
/// let fields = fields! { "user" => "alice", "attempts" => 3, "admin" => false };
/// assert_eq!(fields.len(), 3);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Fields::new()$(.with_field($key, $value))+
    };
}

/// Convert a list of operands into `FieldValue`s for the values-style methods.
///
/// # Examples
///
/// ```
/// use husplus_logger::prelude::*;
/// use husplus_logger::values;
///
/// let logger = Logger::builder().output(std::io::sink()).build();
/// logger.infoln(None, values!["processed", 42, "items"]);
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        &[$($crate::FieldValue::from($value)),*]
    };
}
