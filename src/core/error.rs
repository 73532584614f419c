//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP transport error talking to the indexing backend
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Backend address that is not a valid URL
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// No backend node answered the health check
    #[error("Remote backend unavailable at [{endpoints}]: {message}")]
    RemoteUnavailable { endpoints: String, message: String },

    /// Backend answered but refused the request
    #[error("Remote backend rejected request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// Delivery queue full with buffer details
    #[error("Delivery queue full: {capacity} records buffered")]
    QueueFull { capacity: usize },

    /// Delivery worker is gone
    #[error("Delivery worker stopped")]
    WorkerStopped,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid endpoint error
    pub fn endpoint(endpoint: impl Into<String>, source: url::ParseError) -> Self {
        LoggerError::InvalidEndpoint {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Create a remote-unavailable error for a set of endpoints
    pub fn remote_unavailable<S: AsRef<str>>(endpoints: &[S], message: impl Into<String>) -> Self {
        LoggerError::RemoteUnavailable {
            endpoints: endpoints
                .iter()
                .map(|e| e.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
            message: message.into(),
        }
    }

    /// Create a remote-rejected error
    pub fn remote_rejected(status: u16, message: impl Into<String>) -> Self {
        LoggerError::RemoteRejected {
            status,
            message: message.into(),
        }
    }

    /// Create a queue full error
    pub fn queue_full(capacity: usize) -> Self {
        LoggerError::QueueFull { capacity }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
