//! Sink trait for record delivery targets

use super::{error::Result, log_level::LogLevel, record::Record};

/// A delivery target for formatted records.
///
/// `deliver` takes `&self` so dispatch can run from many threads at once;
/// implementations synchronize internally.
pub trait Sink: Send + Sync {
    /// Deliver one record. `formatted` is the output of the active formatter.
    fn deliver(&self, record: &Record, formatted: &[u8]) -> Result<()>;

    /// Least severe level this sink accepts, applied after the logger's own filter
    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;

    fn accepts(&self, level: LogLevel) -> bool {
        level.permitted_by(self.min_level())
    }
}
