//! Integration tests for the logging facade
//!
//! These tests verify:
//! - Level filtering across the operation family
//! - Injected service and caller fields
//! - Formatter switching at runtime
//! - Per-sink thresholds and failure isolation
//! - Remote delivery through a mock index client
//! - Fatal and Panic termination

use husplus_logger::sinks::{IndexClient, IndexDocument, RemoteSink, RemoteSinkConfig};
use husplus_logger::{fields, info, values, warn};
use husplus_logger::{
    LogLevel, Logger, LoggerConfig, LoggerError, OutputFormat, Record, Result, Sink, TraceContext,
};
use parking_lot::Mutex;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().clone())
            .expect("output is utf-8")
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("line is a JSON object"))
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct CollectingSink {
    min_level: LogLevel,
    seen: Arc<Mutex<Vec<Record>>>,
}

impl Sink for CollectingSink {
    fn deliver(&self, record: &Record, _formatted: &[u8]) -> Result<()> {
        self.seen.lock().push(record.clone());
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn name(&self) -> &str {
        "collecting"
    }
}

#[derive(Clone, Default)]
struct MockIndex {
    documents: Arc<Mutex<Vec<IndexDocument>>>,
}

impl IndexClient for MockIndex {
    fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn bulk(&self, _index: &str, documents: &[IndexDocument]) -> Result<()> {
        self.documents.lock().extend_from_slice(documents);
        Ok(())
    }
}

/// Index client whose bulk requests wait until the gate is released
struct GatedIndex {
    gate: Arc<Mutex<()>>,
}

impl IndexClient for GatedIndex {
    fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn bulk(&self, _index: &str, _documents: &[IndexDocument]) -> Result<()> {
        let _open = self.gate.lock();
        Ok(())
    }
}

/// Minimal HTTP backend answering every request with `200 OK` and an
/// error-free bulk reply. Returns its base URL.
fn spawn_ok_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local backend");
    let addr = listener.local_addr().expect("local address");

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let mut reader = BufReader::new(stream);

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            let mut body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut body);

            let reply = r#"{"errors":false}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.len(),
                reply
            );
            let _ = reader.get_mut().write_all(response.as_bytes());
        }
    });

    format!("http://{}", addr)
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }
}

fn logger_at(level: LogLevel) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .host_ip("192.168.1.20")
        .min_level(level)
        .output(buffer.clone())
        .build();
    (logger, buffer)
}

#[test]
fn test_severity_above_threshold_reaches_no_sink() {
    for min in LogLevel::ALL {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (logger, buffer) = logger_at(min);
        logger.add_sink(Box::new(CollectingSink {
            min_level: LogLevel::Debug,
            seen: Arc::clone(&seen),
        }));

        logger.debug(None, values!["d"]);
        logger.info(None, values!["i"]);
        logger.warn(None, values!["w"]);
        logger.error(None, values!["e"]);

        let expected: Vec<LogLevel> = [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error]
            .into_iter()
            .filter(|level| *level <= min)
            .collect();
        let delivered: Vec<LogLevel> = seen.lock().iter().map(|r| r.level).collect();

        assert_eq!(delivered, expected, "min level {}", min);
        assert_eq!(buffer.lines().len(), expected.len());
    }
}

#[test]
fn test_every_record_carries_service_identity() {
    let (logger, buffer) = logger_at(LogLevel::Debug);

    logger.debugf(None, format_args!("a"));
    logger.with_fields(fields! { "k" => "v" }).warningln(None, values!["b"]);
    logger.log_at(LogLevel::Error, None, None, format_args!("c"));

    for record in buffer.records() {
        assert_eq!(record["serviceName"], "Husplus");
        assert_eq!(record["ip"], "192.168.1.20");
    }
}

#[test]
fn test_supplied_and_injected_fields_round_trip() {
    let (logger, buffer) = logger_at(LogLevel::Debug);

    logger
        .with_fields(fields! { "name" => "worker", "attempt" => 2, "ok" => true })
        .debug(None, values!["starting"]);

    let record = &buffer.records()[0];
    assert_eq!(record["level"], "debug");
    assert_eq!(record["message"], "starting");
    assert_eq!(record["name"], "worker");
    assert_eq!(record["attempt"], 2);
    assert_eq!(record["ok"], true);
    assert_eq!(record["file"], "integration_tests.rs");
    assert!(record["time"].as_str().is_some());
}

#[test]
fn test_formatter_switch_only_affects_later_records() {
    let (logger, buffer) = logger_at(LogLevel::Info);

    logger.info(None, values!["before"]);
    logger.use_text_formatter();
    logger.info(None, values!["after switch"]);

    let lines = buffer.lines();
    let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(first["message"], "before");
    assert!(lines[1].starts_with("time="));
    assert!(lines[1].contains(r#"message="after switch""#));
    assert!(lines[1].contains("serviceName=Husplus"));
}

#[test]
fn test_config_from_lookup_drives_logger() {
    let config = LoggerConfig::from_lookup(|key| match key {
        "LOGGER_SERVICENAME" => Some("inventory".to_string()),
        "LOGGER_LEVEL" => Some("3".to_string()),
        "LOGGER_FORMATTER" => Some("text".to_string()),
        _ => None,
    });
    let buffer = SharedBuffer::default();
    let logger = Logger::builder().config(config).output(buffer.clone()).build();

    assert_eq!(logger.level(), LogLevel::Warn);
    assert_eq!(logger.output_format(), OutputFormat::Text);

    logger.info(None, values!["dropped"]);
    logger.warn(None, values!["kept"]);

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("serviceName=inventory"));
    assert!(lines[0].contains("level=warning"));
}

#[test]
fn test_runtime_overrides_win() {
    let (logger, buffer) = logger_at(LogLevel::Info);

    logger.set_service_name("payments");
    logger.set_level(LogLevel::Debug);
    logger.debug(None, values!["visible"]);

    let record = &buffer.records()[0];
    assert_eq!(record["serviceName"], "payments");
}

#[test]
fn test_remote_threshold_warn() {
    let index = MockIndex::default();
    let (logger, buffer) = logger_at(LogLevel::Debug);
    let remote = RemoteSink::with_client(
        index.clone(),
        LogLevel::Warn,
        "Husplus",
        RemoteSinkConfig::default(),
    );
    let metrics = remote.metrics();
    logger.add_sink(Box::new(remote));

    logger.debug(None, values!["d"]);
    logger.info(None, values!["i"]);
    logger.warn(None, values!["w"]);
    logger.error(None, values!["e"]);
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.panic(None, values!["p"]);
    }));
    logger.flush().unwrap();

    assert_eq!(buffer.lines().len(), 5);
    let levels: Vec<String> = index.documents.lock().iter().map(|d| d.level.clone()).collect();
    assert_eq!(levels, vec!["WARNING", "ERROR", "PANIC"]);
    assert_eq!(metrics.delivered(), 3);

    let documents = index.documents.lock();
    let document = &documents[0];
    assert_eq!(document.host, "Husplus");
    assert_eq!(document.message, "w");
    assert!(document.data.contains_key("serviceName"));
}

#[test]
fn test_broken_local_writer_does_not_block_remote() {
    let index = MockIndex::default();
    let logger = Logger::builder().output(BrokenPipe).build();
    logger.add_sink(Box::new(RemoteSink::with_client(
        index.clone(),
        LogLevel::Debug,
        "Husplus",
        RemoteSinkConfig::default(),
    )));

    for i in 0..10 {
        logger.infof(None, format_args!("event {}", i));
    }
    let _ = logger.flush();

    assert_eq!(logger.metrics().local_failures(), 10);
    assert_eq!(index.documents.lock().len(), 10);
}

#[test]
fn test_fatal_writes_locally_then_exits() {
    let index = MockIndex::default();
    let exit_code = Arc::new(AtomicI32::new(-1));
    let code = Arc::clone(&exit_code);
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .output(buffer.clone())
        .exit_handler(Arc::new(move |c| code.store(c, Ordering::SeqCst)))
        .build();
    logger.add_sink(Box::new(RemoteSink::with_client(
        index,
        LogLevel::Error,
        "Husplus",
        RemoteSinkConfig::default(),
    )));

    logger.fatalln(Some(&TraceContext::new()), values!["disk", "gone"]);

    assert_eq!(exit_code.load(Ordering::SeqCst), 1);
    let record = &buffer.records()[0];
    assert_eq!(record["level"], "fatal");
    assert_eq!(record["message"], "disk gone");
}

#[test]
fn test_fatal_hands_record_to_remote_before_exit() {
    let gate = Arc::new(Mutex::new(()));
    let closed = gate.lock();
    let remote = RemoteSink::with_client(
        GatedIndex {
            gate: Arc::clone(&gate),
        },
        LogLevel::Error,
        "Husplus",
        RemoteSinkConfig::default(),
    );
    let metrics = remote.metrics();

    let queued_at_exit = Arc::new(AtomicU64::new(u64::MAX));
    let delivered_at_exit = Arc::new(AtomicU64::new(u64::MAX));
    let handler_metrics = Arc::clone(&metrics);
    let (queued, delivered) = (Arc::clone(&queued_at_exit), Arc::clone(&delivered_at_exit));
    let exit_code = Arc::new(AtomicI32::new(-1));
    let code = Arc::clone(&exit_code);

    let logger = Logger::builder()
        .output(io::sink())
        .exit_handler(Arc::new(move |c| {
            queued.store(handler_metrics.queued(), Ordering::SeqCst);
            delivered.store(handler_metrics.delivered(), Ordering::SeqCst);
            code.store(c, Ordering::SeqCst);
        }))
        .build();
    logger.add_sink(Box::new(remote));

    // The backend is stalled, so returning at all shows Fatal does not wait on delivery
    logger.fatalf(None, format_args!("replica {} lost", 3));

    assert_eq!(exit_code.load(Ordering::SeqCst), 1);
    assert_eq!(queued_at_exit.load(Ordering::SeqCst), 1);
    assert_eq!(delivered_at_exit.load(Ordering::SeqCst), 0);

    drop(closed);
    logger.flush().unwrap();
    assert_eq!(metrics.delivered(), 1);
}

#[test]
#[should_panic(expected = "invariant broken")]
fn test_panic_severity() {
    let (logger, _buffer) = logger_at(LogLevel::Info);
    logger.panicf(None, format_args!("invariant {}", "broken"));
}

#[test]
fn test_macros_capture_function_name() {
    let (logger, buffer) = logger_at(LogLevel::Debug);

    info!(logger, "user {} logged in", 7);
    warn!(logger.with_fields(fields! { "user" => 7 }), "second attempt");

    let records = buffer.records();
    assert_eq!(records[0]["func"], "test_macros_capture_function_name");
    assert_eq!(records[0]["message"], "user 7 logged in");
    assert_eq!(records[1]["func"], "test_macros_capture_function_name");
    assert_eq!(records[1]["user"], 7);
}

#[test]
fn test_add_remote_sink_unreachable_registers_nothing() {
    let (logger, _buffer) = logger_at(LogLevel::Info);

    let err = logger
        .add_remote_sink(&["http://127.0.0.1:1"], LogLevel::Warn)
        .unwrap_err();

    assert!(matches!(err, LoggerError::RemoteUnavailable { .. }));
    assert_eq!(logger.sink_count(), 1);
}

#[tokio::test]
async fn test_add_remote_sink_inside_async_runtime() {
    let endpoint = spawn_ok_backend();
    let (logger, buffer) = logger_at(LogLevel::Info);

    logger
        .add_remote_sink(&[endpoint.as_str()], LogLevel::Warn)
        .expect("reachable backend registers");
    assert_eq!(logger.sink_count(), 2);

    logger.errorf(None, format_args!("from {}", "async"));
    logger.flush().expect("remote queue drains");
    assert_eq!(buffer.records()[0]["message"], "from async");
}
