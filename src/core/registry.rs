//! Registry of delivery sinks
//!
//! The local stream is a fixed slot that is always written first and cannot
//! be removed. Additional sinks are append-only.

use super::{metrics::LoggerMetrics, record::Record, sink::Sink};
use crate::sinks::LocalStream;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;

pub struct SinkRegistry {
    local: LocalStream,
    sinks: RwLock<Vec<Box<dyn Sink>>>,
    metrics: Arc<LoggerMetrics>,
}

impl SinkRegistry {
    pub fn new(local: LocalStream, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            local,
            sinks: RwLock::new(Vec::new()),
            metrics,
        }
    }

    pub fn local(&self) -> &LocalStream {
        &self.local
    }

    pub fn add(&self, sink: Box<dyn Sink>) {
        self.sinks.write().push(sink);
    }

    /// Number of sinks, the local stream included
    pub fn count(&self) -> usize {
        self.sinks.read().len() + 1
    }

    /// Hand a record to every sink that accepts its level.
    ///
    /// Never fails: local write errors are counted, other sinks are isolated
    /// from each other's errors and panics.
    pub fn dispatch(&self, record: &Record, formatted: &[u8]) {
        if self.local.deliver(record, formatted).is_err() {
            self.metrics.record_local_failure();
        }

        let sinks = self.sinks.read();
        for (idx, sink) in sinks.iter().enumerate() {
            if !sink.accepts(record.level) {
                continue;
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.deliver(record, formatted)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(_)) => {
                    // Remote sinks report their own drops; only count here.
                    self.metrics.record_sink_error();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} ({}) panicked: {}. \
                         Other sinks continue to function.",
                        idx,
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    );
                    self.metrics.record_sink_error();
                }
            }
        }
    }

    /// Flush every sink; the first error is reported after all were tried
    pub fn flush(&self) -> crate::core::Result<()> {
        let mut first_err = self.local.flush().err();
        for sink in self.sinks.read().iter() {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
