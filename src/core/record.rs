//! Record structure and message rendering

use super::fields::{FieldValue, Fields};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One log emission: severity, rendered message, fields, and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub level: LogLevel,
    pub message: String,
    pub time: DateTime<Utc>,
    pub fields: Fields,
}

impl Record {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: Utc::now(),
            fields: Fields::new(),
        }
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }
}

/// Request-scoped context passed alongside every logging call.
///
/// Carries an optional trace identifier for a future correlation field; the
/// enrichment step does not read it yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceContext {
    trace_id: Option<String>,
}

impl TraceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

/// Concatenate operands, adding a space between two adjacent non-string operands
pub fn render_values(args: &[FieldValue]) -> String {
    let mut message = String::new();
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 && !arg.is_string() && !args[idx - 1].is_string() {
            message.push(' ');
        }
        message.push_str(&arg.to_string());
    }
    message
}

/// Join operands with single spaces
///
/// The line terminator is left to the formatter, which ends every record
/// with a newline.
pub fn render_values_ln(args: &[FieldValue]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
