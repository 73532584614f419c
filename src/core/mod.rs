//! Core logger types and traits

pub mod call_site;
pub mod config;
pub mod enricher;
pub mod error;
pub mod fields;
pub mod host;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod overflow_policy;
pub mod record;
pub mod registry;
pub mod sink;
pub mod timestamp;

pub use call_site::CallSite;
pub use config::{LoggerConfig, DEFAULT_SERVICE_NAME, ENV_FORMATTER, ENV_LEVEL, ENV_SERVICE_NAME};
pub use enricher::FieldEnricher;
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use log_level::LogLevel;
pub use logger::{Entry, ExitHandler, Logger, LoggerBuilder};
pub use metrics::{DeliveryMetrics, LoggerMetrics};
pub use output_format::OutputFormat;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use record::{render_values, render_values_ln, Record, TraceContext};
pub use registry::SinkRegistry;
pub use sink::Sink;
pub use timestamp::TimestampFormat;
