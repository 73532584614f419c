//! Output formats for records
//!
//! - Json: one flat JSON object per line (default)
//! - Text: human-readable `key=value` line

use super::error::Result;
use super::fields::FieldValue;
use super::record::Record;
use super::timestamp::TimestampFormat;
use std::fmt::Write as _;
use std::str::FromStr;

pub const KEY_TIME: &str = "time";
pub const KEY_LEVEL: &str = "level";
pub const KEY_MESSAGE: &str = "message";

/// Output format for records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Example: `{"ip":"10.0.0.7","level":"info","message":"ready","serviceName":"Husplus","time":"2025-01-08T10:30:45Z"}`
    #[default]
    Json,

    /// Example: `time=2025-01-08T10:30:45Z level=info message=ready ip=10.0.0.7 serviceName=Husplus`
    Text,
}

impl OutputFormat {
    /// Resolve the `LOGGER_FORMATTER` value; anything but `text` selects JSON
    pub fn from_env_value(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Serialize a record, newline terminated
    pub fn format(&self, record: &Record, timestamp_format: &TimestampFormat) -> Result<Vec<u8>> {
        let mut bytes = match self {
            OutputFormat::Json => self.format_json(record, timestamp_format)?,
            OutputFormat::Text => self.format_text(record, timestamp_format).into_bytes(),
        };
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn format_json(&self, record: &Record, timestamp_format: &TimestampFormat) -> Result<Vec<u8>> {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in record.fields.iter() {
            let key = match key.as_str() {
                KEY_TIME | KEY_LEVEL | KEY_MESSAGE => format!("fields.{}", key),
                _ => key.clone(),
            };
            json_obj.insert(key, value.to_json_value());
        }

        json_obj.insert(
            KEY_TIME.to_string(),
            timestamp_format.to_json_value(&record.time),
        );
        json_obj.insert(
            KEY_LEVEL.to_string(),
            serde_json::Value::String(record.level.to_str().to_string()),
        );
        json_obj.insert(
            KEY_MESSAGE.to_string(),
            serde_json::Value::String(record.message.clone()),
        );

        Ok(serde_json::to_vec(&serde_json::Value::Object(json_obj))?)
    }

    fn format_text(&self, record: &Record, timestamp_format: &TimestampFormat) -> String {
        let mut line = format!(
            "{}={} {}={} {}={}",
            KEY_TIME,
            escape_text_value(&timestamp_format.format(&record.time)),
            KEY_LEVEL,
            record.level.to_str(),
            KEY_MESSAGE,
            escape_text_value(&record.message),
        );

        for (key, value) in record.fields.iter() {
            let rendered = match value {
                FieldValue::String(s) => escape_text_value(s),
                other => escape_text_value(&other.to_string()),
            };
            let _ = write!(line, " {}={}", escape_text_key(key), rendered);
        }

        line
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown formatter: '{}'", s)),
        }
    }
}

/// Escape a key (drop spaces and special chars)
fn escape_text_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Quote a value when it is empty or contains spaces, quotes, `=` or control characters
fn escape_text_value(value: &str) -> String {
    let needs_quoting = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=');
    if !needs_quoting {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
