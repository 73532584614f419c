//! Environment-driven logger configuration
//!
//! Resolved once when a logger is built. Explicit setters on the logger
//! override these values afterwards.

use super::error::{LoggerError, Result};
use super::host;
use super::log_level::LogLevel;
use super::output_format::OutputFormat;

pub const ENV_SERVICE_NAME: &str = "LOGGER_SERVICENAME";
pub const ENV_LEVEL: &str = "LOGGER_LEVEL";
pub const ENV_FORMATTER: &str = "LOGGER_FORMATTER";

pub const DEFAULT_SERVICE_NAME: &str = "Husplus";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub service_name: String,
    /// Non-loopback IPv4 of this host, empty when unknown
    pub host_ip: String,
    pub min_level: LogLevel,
    pub output_format: OutputFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            host_ip: String::new(),
            min_level: LogLevel::Info,
            output_format: OutputFormat::Json,
        }
    }
}

impl LoggerConfig {
    /// Read the process environment and discover the host IP
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok()).with_host_ip(host::resolve_host_ip())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// Does not touch the network; `host_ip` stays empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_name = lookup(ENV_SERVICE_NAME)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        let min_level = match lookup(ENV_LEVEL).filter(|raw| !raw.is_empty()) {
            None => LogLevel::Info,
            Some(raw) => Self::parse_level(&raw).unwrap_or_else(|e| {
                eprintln!("[LOGGER WARNING] {}; falling back to info", e);
                LogLevel::Info
            }),
        };

        let output_format = lookup(ENV_FORMATTER)
            .map(|value| OutputFormat::from_env_value(&value))
            .unwrap_or_default();

        Self {
            service_name,
            host_ip: String::new(),
            min_level,
            output_format,
        }
    }

    /// Parse the integer encoding of `LOGGER_LEVEL`
    pub fn parse_level(raw: &str) -> Result<LogLevel> {
        LogLevel::from_numeric_str(raw).map_err(|message| LoggerError::config(ENV_LEVEL, message))
    }

    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    #[must_use]
    pub fn with_host_ip(mut self, host_ip: impl Into<String>) -> Self {
        self.host_ip = host_ip.into();
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}
