//! Main logger implementation
//!
//! Every logging call runs the same pipeline on the calling thread:
//! level filter, field enrichment, message rendering, formatting, and
//! dispatch to the sink registry. Fatal and Panic severities terminate after
//! dispatch.

use super::{
    call_site::CallSite,
    config::LoggerConfig,
    enricher::FieldEnricher,
    error::Result,
    fields::{FieldValue, Fields},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    record::{render_values, render_values_ln, Record, TraceContext},
    registry::SinkRegistry,
    sink::Sink,
    timestamp::TimestampFormat,
};
use crate::sinks::{LocalStream, RemoteSink, RemoteSinkConfig};
use parking_lot::RwLock;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Called with exit code 1 after a Fatal record was dispatched
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

fn process_exit() -> ExitHandler {
    Arc::new(|code| std::process::exit(code))
}

/// Generates the values / values-with-newline / format triple for each
/// severity. The receiver must provide `emit`.
macro_rules! severity_methods {
    ($($level:ident => $values:ident, $values_ln:ident, $format:ident;)+) => {
        $(
            #[doc = concat!("Log operands at `", stringify!($level), "` severity")]
            #[track_caller]
            pub fn $values(&self, ctx: Option<&TraceContext>, args: &[FieldValue]) {
                self.emit(LogLevel::$level, ctx, Some(CallSite::caller()), || {
                    render_values(args)
                });
            }

            #[doc = concat!("Log space-separated operands at `", stringify!($level), "` severity")]
            #[track_caller]
            pub fn $values_ln(&self, ctx: Option<&TraceContext>, args: &[FieldValue]) {
                self.emit(LogLevel::$level, ctx, Some(CallSite::caller()), || {
                    render_values_ln(args)
                });
            }

            #[doc = concat!("Log a formatted message at `", stringify!($level), "` severity")]
            #[track_caller]
            pub fn $format(&self, ctx: Option<&TraceContext>, args: fmt::Arguments<'_>) {
                self.emit(LogLevel::$level, ctx, Some(CallSite::caller()), || {
                    fmt::format(args)
                });
            }
        )+
    };
}

/// Structured logging facade
///
/// # Example
///
/// ```
/// use husplus_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .service_name("orders")
///     .min_level(LogLevel::Debug)
///     .output(std::io::sink())
///     .build();
///
/// logger.infof(None, format_args!("listening on port {}", 8080));
/// logger.debugln(None, &["cache".into(), "warm".into()]);
/// ```
pub struct Logger {
    service_name: RwLock<String>,
    host_ip: String,
    min_level: RwLock<LogLevel>,
    output_format: RwLock<OutputFormat>,
    timestamp_format: TimestampFormat,
    registry: SinkRegistry,
    metrics: Arc<LoggerMetrics>,
    exit_handler: ExitHandler,
}

impl Logger {
    /// Logger with default configuration writing to stderr; the environment
    /// is not consulted
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Logger configured from `LOGGER_*` variables, with the host IP resolved
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_config(LoggerConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: LoggerConfig) -> Self {
        Self::builder().config(config).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_service_name(&self, service_name: impl Into<String>) {
        *self.service_name.write() = service_name.into();
    }

    pub fn service_name(&self) -> String {
        self.service_name.read().clone()
    }

    pub fn host_ip(&self) -> &str {
        &self.host_ip
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Whether a record at `level` would pass the level filter
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.permitted_by(self.level())
    }

    pub fn use_json_formatter(&self) {
        self.set_output_format(OutputFormat::Json);
    }

    pub fn use_text_formatter(&self) {
        self.set_output_format(OutputFormat::Text);
    }

    pub fn set_output_format(&self, format: OutputFormat) {
        *self.output_format.write() = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        *self.output_format.read()
    }

    /// Redirect the local stream; records already written stay where they are
    pub fn set_output<W: Write + Send + 'static>(&self, writer: W) {
        self.registry.local().replace_writer(writer);
    }

    /// Register an additional sink. Sinks cannot be removed.
    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        self.registry.add(sink);
    }

    /// Connect to an indexing backend and forward records at `min_level`
    /// or more severe to it.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is malformed or no node answers the
    /// health check. Nothing is registered in that case.
    pub fn add_remote_sink<S: AsRef<str>>(&self, endpoints: &[S], min_level: LogLevel) -> Result<()> {
        self.add_remote_sink_with_config(endpoints, min_level, RemoteSinkConfig::default())
    }

    pub fn add_remote_sink_with_config<S: AsRef<str>>(
        &self,
        endpoints: &[S],
        min_level: LogLevel,
        config: RemoteSinkConfig,
    ) -> Result<()> {
        let sink = RemoteSink::connect(endpoints, min_level, self.service_name(), config)?;
        self.registry.add(Box::new(sink));
        Ok(())
    }

    /// Number of sinks, the local stream included
    pub fn sink_count(&self) -> usize {
        self.registry.count()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every sink. Remote sinks wait for their queue to drain.
    pub fn flush(&self) -> Result<()> {
        self.registry.flush()
    }

    /// Attach caller-supplied fields to the records logged through the
    /// returned entry. Injected fields win on key clashes.
    pub fn with_fields(&self, fields: Fields) -> Entry<'_> {
        Entry {
            logger: self,
            fields,
        }
    }

    /// Log a formatted message with an explicit call site.
    ///
    /// This is the entry point used by the logging macros.
    #[track_caller]
    pub fn log_at(
        &self,
        level: LogLevel,
        ctx: Option<&TraceContext>,
        call_site: Option<CallSite>,
        args: fmt::Arguments<'_>,
    ) {
        self.emit(level, ctx, call_site, || fmt::format(args));
    }

    severity_methods! {
        Debug => debug, debugln, debugf;
        Info => info, infoln, infof;
        Info => print, println, printf;
        Warn => warn, warnln, warnf;
        Warn => warning, warningln, warningf;
        Error => error, errorln, errorf;
        Fatal => fatal, fatalln, fatalf;
        Panic => panic, panicln, panicf;
    }

    #[track_caller]
    fn emit<F>(&self, level: LogLevel, ctx: Option<&TraceContext>, call_site: Option<CallSite>, render: F)
    where
        F: FnOnce() -> String,
    {
        self.emit_with_fields(level, ctx, call_site, None, render);
    }

    #[track_caller]
    fn emit_with_fields<F>(
        &self,
        level: LogLevel,
        ctx: Option<&TraceContext>,
        call_site: Option<CallSite>,
        user_fields: Option<&Fields>,
        render: F,
    ) where
        F: FnOnce() -> String,
    {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            // Fatal terminates even when the record itself is filtered out
            if level == LogLevel::Fatal {
                self.terminate(level, "");
            }
            return;
        }

        let message = render();
        let record = self.build_record(level, message, call_site.as_ref(), ctx, user_fields);

        match self.output_format().format(&record, &self.timestamp_format) {
            Ok(formatted) => {
                self.registry.dispatch(&record, &formatted);
                self.metrics.record_logged();
            }
            Err(e) => {
                self.metrics.record_format_failure();
                eprintln!("[LOGGER ERROR] Failed to format record: {}", e);
            }
        }

        self.terminate(level, &record.message);
    }

    fn build_record(
        &self,
        level: LogLevel,
        message: String,
        call_site: Option<&CallSite>,
        ctx: Option<&TraceContext>,
        user_fields: Option<&Fields>,
    ) -> Record {
        let injected = {
            let service_name = self.service_name.read();
            FieldEnricher::new(&service_name, &self.host_ip).enrich(call_site, ctx)
        };

        let fields = match user_fields {
            Some(user) => {
                let mut merged = user.clone();
                merged.extend(injected);
                merged
            }
            None => injected,
        };

        Record::new(level, message).with_fields(fields)
    }

    #[track_caller]
    fn terminate(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Panic => panic!("{}", message),
            LogLevel::Fatal => {
                if let Err(e) = self.registry.local().flush() {
                    eprintln!("[LOGGER ERROR] Failed to flush local stream before exit: {}", e);
                }
                (self.exit_handler)(1);
            }
            _ => {}
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.registry.local().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let failures = self.metrics.local_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed local writes",
                failures
            );
        }
    }
}

/// A logger view carrying caller-supplied fields
///
/// # Example
///
/// ```
/// use husplus_logger::{fields, prelude::*};
///
/// let logger = Logger::builder().output(std::io::sink()).build();
/// logger
///     .with_fields(fields! { "orderId" => 42, "region" => "eu" })
///     .infof(None, format_args!("order accepted"));
/// ```
pub struct Entry<'a> {
    logger: &'a Logger,
    fields: Fields,
}

impl<'a> Entry<'a> {
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key, value);
        self
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.logger.enabled(level)
    }

    #[track_caller]
    pub fn log_at(
        &self,
        level: LogLevel,
        ctx: Option<&TraceContext>,
        call_site: Option<CallSite>,
        args: fmt::Arguments<'_>,
    ) {
        self.emit(level, ctx, call_site, || fmt::format(args));
    }

    severity_methods! {
        Debug => debug, debugln, debugf;
        Info => info, infoln, infof;
        Info => print, println, printf;
        Warn => warn, warnln, warnf;
        Warn => warning, warningln, warningf;
        Error => error, errorln, errorf;
        Fatal => fatal, fatalln, fatalf;
        Panic => panic, panicln, panicf;
    }

    #[track_caller]
    fn emit<F>(&self, level: LogLevel, ctx: Option<&TraceContext>, call_site: Option<CallSite>, render: F)
    where
        F: FnOnce() -> String,
    {
        self.logger
            .emit_with_fields(level, ctx, call_site, Some(&self.fields), render);
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// Starts from [`LoggerConfig::default`]; the environment is only consulted
/// when a config from [`LoggerConfig::from_env`] is passed in.
///
/// # Example
/// ```
/// use husplus_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .service_name("billing")
///     .min_level(LogLevel::Debug)
///     .output_format(OutputFormat::Text)
///     .output(std::io::sink())
///     .exit_handler(Arc::new(|code| eprintln!("would exit with {}", code)))
///     .build();
///
/// assert_eq!(logger.level(), LogLevel::Debug);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    output: Option<Box<dyn Write + Send>>,
    timestamp_format: TimestampFormat,
    exit_handler: Option<ExitHandler>,
    sinks: Vec<Box<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            output: None,
            timestamp_format: TimestampFormat::default(),
            exit_handler: None,
            sinks: Vec::new(),
        }
    }

    /// Replace the whole configuration; later setters still apply on top
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.config.service_name = service_name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn host_ip(mut self, host_ip: impl Into<String>) -> Self {
        self.config.host_ip = host_ip.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Writer for the local stream (stderr when not set)
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.output = Some(Box::new(writer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Replace `std::process::exit` as the Fatal severity's final step
    #[must_use = "builder methods return a new value"]
    pub fn exit_handler(mut self, handler: ExitHandler) -> Self {
        self.exit_handler = Some(handler);
        self
    }

    /// Register an additional sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn build(self) -> Logger {
        let local = match self.output {
            Some(writer) => LocalStream::new(writer),
            None => LocalStream::stderr(),
        };
        let metrics = Arc::new(LoggerMetrics::new());
        let registry = SinkRegistry::new(local, Arc::clone(&metrics));
        for sink in self.sinks {
            registry.add(sink);
        }

        Logger {
            service_name: RwLock::new(self.config.service_name),
            host_ip: self.config.host_ip,
            min_level: RwLock::new(self.config.min_level),
            output_format: RwLock::new(self.config.output_format),
            timestamp_format: self.timestamp_format,
            registry,
            metrics,
            exit_handler: self.exit_handler.unwrap_or_else(process_exit),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
