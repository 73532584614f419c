//! Delivery sinks: the local stream and remote indexing backends

pub mod index_client;
pub mod local;
pub mod remote;

pub use index_client::{HttpIndexClient, IndexClient, IndexDocument};
pub use local::LocalStream;
pub use remote::{RemoteSink, RemoteSinkConfig, DEFAULT_INDEX, DEFAULT_QUEUE_CAPACITY};
