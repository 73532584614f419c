//! Process-wide logger
//!
//! The shared instance is built on first use from the `LOGGER_*` environment
//! variables and the host's first non-loopback IPv4 address. It lives for the
//! rest of the process and is never drained on exit.

use crate::core::{CallSite, FieldValue, LogLevel, Logger, TraceContext};
use once_cell::sync::Lazy;
use std::fmt;
use std::io::Write;

static DEFAULT_LOGGER: Lazy<Logger> = Lazy::new(Logger::from_env);

/// The process-wide logger, initialized on first access
pub fn logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

/// Overrides `LOGGER_SERVICENAME`
pub fn set_service_name(service_name: impl Into<String>) {
    logger().set_service_name(service_name);
}

/// Overrides `LOGGER_LEVEL`
pub fn set_level(level: LogLevel) {
    logger().set_level(level);
}

/// Overrides `LOGGER_FORMATTER`
pub fn use_json_formatter() {
    logger().use_json_formatter();
}

/// Overrides `LOGGER_FORMATTER`
pub fn use_text_formatter() {
    logger().use_text_formatter();
}

pub fn set_output<W: Write + Send + 'static>(writer: W) {
    logger().set_output(writer);
}

/// Forward records at `min_level` or more severe to an Elasticsearch cluster.
///
/// # Panics
///
/// A malformed endpoint or an unreachable cluster is a wiring error: it is
/// logged at panic severity, which panics.
#[track_caller]
pub fn add_remote_sink<S: AsRef<str>>(endpoints: &[S], min_level: LogLevel) {
    if let Err(e) = logger().add_remote_sink(endpoints, min_level) {
        logger().panicf(None, format_args!("{}", e));
    }
}

/// Log a formatted message with an explicit call site through the
/// process-wide logger
#[track_caller]
pub fn log_at(
    level: LogLevel,
    ctx: Option<&TraceContext>,
    call_site: Option<CallSite>,
    args: fmt::Arguments<'_>,
) {
    logger().log_at(level, ctx, call_site, args);
}

macro_rules! global_severity_functions {
    ($($values:ident, $values_ln:ident, $format:ident;)+) => {
        $(
            #[track_caller]
            pub fn $values(ctx: Option<&TraceContext>, args: &[FieldValue]) {
                logger().$values(ctx, args);
            }

            #[track_caller]
            pub fn $values_ln(ctx: Option<&TraceContext>, args: &[FieldValue]) {
                logger().$values_ln(ctx, args);
            }

            #[track_caller]
            pub fn $format(ctx: Option<&TraceContext>, args: fmt::Arguments<'_>) {
                logger().$format(ctx, args);
            }
        )+
    };
}

global_severity_functions! {
    debug, debugln, debugf;
    info, infoln, infof;
    print, println, printf;
    warn, warnln, warnf;
    warning, warningln, warningf;
    error, errorln, errorf;
    fatal, fatalln, fatalf;
    panic, panicln, panicf;
}
