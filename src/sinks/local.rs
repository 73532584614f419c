//! Local stream sink (stderr by default)

use crate::core::{LoggerError, Record, Result, Sink};
use parking_lot::Mutex;
use std::io::Write;

/// Synchronous sink writing formatted records to a byte stream.
///
/// Writes happen on the calling thread; the mutex keeps records from
/// interleaving when several threads log at once.
pub struct LocalStream {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl LocalStream {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    /// Swap the underlying writer; records already written are unaffected
    pub fn replace_writer<W: Write + Send + 'static>(&self, writer: W) {
        *self.writer.lock() = Box::new(writer);
    }
}

impl Default for LocalStream {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Sink for LocalStream {
    fn deliver(&self, _record: &Record, formatted: &[u8]) -> Result<()> {
        self.writer
            .lock()
            .write_all(formatted)
            .map_err(|e| LoggerError::io_operation("writing record", "local stream write failed", e))
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "local"
    }
}
