//! # Husplus Logger
//!
//! Structured logging facade shared by Husplus services.
//!
//! Every record is decorated with the service name, the host IP, and the
//! caller's location, formatted as JSON or text, and written to a local
//! stream. Records can additionally be forwarded to Elasticsearch through
//! asynchronous, best-effort remote sinks.
//!
//! ## Features
//!
//! - **Process-wide logger**: configured from `LOGGER_SERVICENAME`,
//!   `LOGGER_LEVEL`, and `LOGGER_FORMATTER`, adjustable at runtime
//! - **Caller fields**: `func`, `file`, and `line` captured at the call site
//! - **Remote sinks**: bounded queue and background batching, never blocking
//!   the caller
//! - **Explicit instances**: build isolated loggers for tests and embedding
//!
//! ```no_run
//! use husplus_logger::{self as log, LogLevel};
//!
//! log::set_service_name("orders");
//! log::add_remote_sink(&["http://es-1:9200"], LogLevel::Warn);
//!
//! log::infof(None, format_args!("listening on {}", 8080));
//! log::warnln(None, husplus_logger::values!["queue depth", 512]);
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallSite, Entry, FieldValue, Fields, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, OutputFormat, OverflowPolicy, Result, Sink, TimestampFormat,
        TraceContext,
    };
}

pub use crate::core::{
    CallSite, DeliveryMetrics, Entry, ExitHandler, FieldValue, Fields, LogLevel, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, OverflowCallback,
    OverflowPolicy, Record, Result, Sink, TimestampFormat, TraceContext,
};
pub use crate::global::{
    add_remote_sink, debug, debugf, debugln, error, errorf, errorln, fatal, fatalf, fatalln, info,
    infof, infoln, log_at, logger, panic, panicf, panicln, print, printf, println, set_level,
    set_output, set_service_name, use_json_formatter, use_text_formatter, warn, warnf, warning,
    warningf, warningln, warnln,
};
pub use crate::sinks::{LocalStream, RemoteSink, RemoteSinkConfig};
