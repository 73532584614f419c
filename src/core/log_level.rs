//! Severity levels and the level filter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity, most severe first.
///
/// The numeric value doubles as the `LOGGER_LEVEL` environment encoding:
/// `0=Panic 1=Fatal 2=Error 3=Warn 4=Info 5=Debug`. A level passes the
/// filter when it is numerically less than or equal to the configured minimum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    Panic = 0,
    Fatal = 1,
    Error = 2,
    Warn = 3,
    #[default]
    Info = 4,
    Debug = 5,
}

impl LogLevel {
    /// All levels in ascending numeric order
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Panic,
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Lowercase name used in formatted records
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Uppercase name used in remote index documents
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            LogLevel::Panic => "PANIC",
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Numeric value of the level
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Map a numeric level back to a `LogLevel`; values above 5 clamp to `Debug`
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Panic,
            1 => LogLevel::Fatal,
            2 => LogLevel::Error,
            3 => LogLevel::Warn,
            4 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    /// Parse the integer encoding used by `LOGGER_LEVEL`
    pub fn from_numeric_str(s: &str) -> Result<Self, String> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|e| format!("'{}' is not an integer level: {}", s, e))?;
        if value < 0 {
            return Err(format!("'{}' is negative; expected 0 (panic) to 5 (debug)", s));
        }
        Ok(Self::from_u8(value.min(u8::MAX as i64) as u8))
    }

    /// Whether a record at this level passes a filter set to `min_level`
    #[inline]
    pub fn permitted_by(self, min_level: LogLevel) -> bool {
        self <= min_level
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" | "print" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
