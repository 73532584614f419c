//! Remote sink forwarding records to an indexing backend
//!
//! Records are converted to index documents on the calling thread and pushed
//! onto a bounded channel. A dedicated worker thread drains the channel in
//! batches and hands them to the [`IndexClient`]. The logging caller never
//! waits on the network: a full queue drops the record.

use super::index_client::{HttpIndexClient, IndexClient, IndexDocument};
use crate::core::{
    DeliveryMetrics, LogLevel, LoggerError, OverflowCallback, OverflowPolicy, Record, Result, Sink,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Index used when none is configured
pub const DEFAULT_INDEX: &str = "huspluslog";

/// Records buffered per sink before new ones are dropped
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Maximum documents per bulk request
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Time the worker waits to fill a partial batch
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_millis(10);

/// HTTP request timeout for health checks and bulk requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Time a dropped sink waits for its worker to drain the queue
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a [`RemoteSink`]
#[derive(Clone)]
pub struct RemoteSinkConfig {
    pub index: String,
    pub queue_capacity: usize,
    pub batch_size: usize,
    pub batch_timeout: Duration,
    pub request_timeout: Duration,
    pub overflow_policy: OverflowPolicy,
    pub on_overflow: Option<OverflowCallback>,
}

impl Default for RemoteSinkConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout: DEFAULT_BATCH_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            overflow_policy: OverflowPolicy::AlertAndDrop,
            on_overflow: None,
        }
    }
}

impl fmt::Debug for RemoteSinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSinkConfig")
            .field("index", &self.index)
            .field("queue_capacity", &self.queue_capacity)
            .field("batch_size", &self.batch_size)
            .field("batch_timeout", &self.batch_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("overflow_policy", &self.overflow_policy)
            .field("on_overflow", &self.on_overflow.is_some())
            .finish()
    }
}

impl RemoteSinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    #[must_use]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }
}

/// Asynchronous, best-effort sink for an indexing backend
///
/// # Example
///
/// ```no_run
/// use husplus_logger::prelude::*;
/// use husplus_logger::sinks::{RemoteSink, RemoteSinkConfig};
///
/// let sink = RemoteSink::connect(
///     &["http://es-1:9200"],
///     LogLevel::Warn,
///     "orders",
///     RemoteSinkConfig::default(),
/// )
/// .expect("backend unreachable");
///
/// let logger = Logger::new();
/// logger.add_sink(Box::new(sink));
/// ```
pub struct RemoteSink {
    name: String,
    min_level: LogLevel,
    host: String,
    queue_capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    sender: Option<Sender<IndexDocument>>,
    worker: Option<thread::JoinHandle<()>>,
    metrics: Arc<DeliveryMetrics>,
    flush_timeout: Duration,
}

impl RemoteSink {
    /// Build an HTTP client for `endpoints`, check the backend answers, and
    /// start the delivery worker.
    ///
    /// The blocking HTTP client is built and pinged on a dedicated thread,
    /// so this may be called from inside an async runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is malformed or no node is reachable.
    pub fn connect<S: AsRef<str>>(
        endpoints: &[S],
        min_level: LogLevel,
        host: impl Into<String>,
        config: RemoteSinkConfig,
    ) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|e| e.as_ref().to_string()).collect();
        let timeout = config.request_timeout;

        let handshake = thread::Builder::new()
            .name("husplus-remote-connect".to_string())
            .spawn(move || -> Result<HttpIndexClient> {
                let client = HttpIndexClient::new(&endpoints, timeout)?;
                client.ping()?;
                Ok(client)
            })?;
        let client = handshake
            .join()
            .map_err(|_| LoggerError::other("remote sink handshake thread panicked"))??;

        let name = format!(
            "remote[{}]",
            client
                .nodes()
                .iter()
                .map(|node| node.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(Self::with_client(client, min_level, host, config).with_name(name))
    }

    /// Start a sink over an already validated client
    pub fn with_client<C: IndexClient + 'static>(
        client: C,
        min_level: LogLevel,
        host: impl Into<String>,
        config: RemoteSinkConfig,
    ) -> Self {
        let (sender, receiver) = bounded(config.queue_capacity);
        let metrics = Arc::new(DeliveryMetrics::new());
        let worker_metrics = Arc::clone(&metrics);
        let index = config.index.clone();
        let batch_size = config.batch_size;
        let batch_timeout = config.batch_timeout;

        let worker = thread::Builder::new()
            .name("husplus-remote-sink".to_string())
            .spawn(move || {
                Self::run_worker(
                    receiver,
                    &client,
                    &index,
                    batch_size,
                    batch_timeout,
                    &worker_metrics,
                )
            });

        let (sender, worker) = match worker {
            Ok(handle) => (Some(sender), Some(handle)),
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to spawn remote delivery worker: {}", e);
                (None, None)
            }
        };

        Self {
            name: "remote".to_string(),
            min_level,
            host: host.into(),
            queue_capacity: config.queue_capacity,
            overflow_policy: config.overflow_policy,
            on_overflow: config.on_overflow,
            sender,
            worker,
            metrics,
            flush_timeout: config.request_timeout * 2,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Delivery counters, shared with the worker thread
    pub fn metrics(&self) -> Arc<DeliveryMetrics> {
        Arc::clone(&self.metrics)
    }

    fn run_worker<C: IndexClient>(
        receiver: Receiver<IndexDocument>,
        client: &C,
        index: &str,
        batch_size: usize,
        batch_timeout: Duration,
        metrics: &DeliveryMetrics,
    ) {
        let mut batch = Vec::with_capacity(batch_size);

        loop {
            match receiver.recv() {
                Ok(document) => batch.push(document),
                Err(_) => {
                    // Channel closed: ship what is left and exit
                    if !batch.is_empty() {
                        Self::deliver_batch(client, index, &batch, metrics);
                    }
                    break;
                }
            }

            while batch.len() < batch_size {
                match receiver.try_recv() {
                    Ok(document) => batch.push(document),
                    Err(_) => break,
                }
            }

            if batch.len() < batch_size {
                thread::sleep(batch_timeout);
                while batch.len() < batch_size {
                    match receiver.try_recv() {
                        Ok(document) => batch.push(document),
                        Err(_) => break,
                    }
                }
            }

            Self::deliver_batch(client, index, &batch, metrics);
            batch.clear();
        }
    }

    fn deliver_batch<C: IndexClient>(
        client: &C,
        index: &str,
        batch: &[IndexDocument],
        metrics: &DeliveryMetrics,
    ) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            client.bulk(index, batch)
        }));

        match result {
            Ok(Ok(())) => {
                metrics.record_delivered(batch.len() as u64);
            }
            Ok(Err(e)) => {
                let failed_before = metrics.record_failed(batch.len() as u64);
                if failed_before == 0 {
                    eprintln!(
                        "[LOGGER WARNING] Remote delivery failed, {} records lost: {}",
                        batch.len(),
                        e
                    );
                }
            }
            Err(_) => {
                metrics.record_failed(batch.len() as u64);
                eprintln!(
                    "[LOGGER CRITICAL] Index client panicked, {} records lost",
                    batch.len()
                );
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped = self.metrics.record_dropped() + 1;

        if self.overflow_policy.should_alert(dropped) {
            eprintln!(
                "[LOGGER WARNING] Remote queue '{}' full, {} records dropped. \
                 The indexing backend is slow or unreachable.",
                self.name, dropped
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped);
            }
        }
    }

    /// Stop accepting records and wait up to `timeout` for the worker to
    /// drain the queue. Returns `true` if the worker finished in time.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.sender.take());

        let Some(handle) = self.worker.take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if handle.join().is_err() {
                    eprintln!("[LOGGER ERROR] Remote delivery worker panicked during shutdown");
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Remote delivery worker did not finish within {:?}. \
                     {} records may be lost.",
                    timeout,
                    self.metrics.pending()
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Sink for RemoteSink {
    fn deliver(&self, record: &Record, _formatted: &[u8]) -> Result<()> {
        let Some(ref sender) = self.sender else {
            return Err(LoggerError::WorkerStopped);
        };

        match sender.try_send(IndexDocument::from_record(record, &self.host)) {
            Ok(()) => {
                self.metrics.record_queued();
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.alert_and_drop();
                Err(LoggerError::queue_full(self.queue_capacity))
            }
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::WorkerStopped),
        }
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Wait until every queued record was delivered or failed
    fn flush(&self) -> Result<()> {
        let start = Instant::now();
        while self.metrics.pending() > 0 {
            if self.worker.as_ref().map_or(true, |w| w.is_finished()) {
                return Err(LoggerError::WorkerStopped);
            }
            if start.elapsed() >= self.flush_timeout {
                return Err(LoggerError::other(format!(
                    "{} records still pending after {:?}",
                    self.metrics.pending(),
                    self.flush_timeout
                )));
            }
            thread::sleep(Duration::from_millis(5));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for RemoteSink {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
