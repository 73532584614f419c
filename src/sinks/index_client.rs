//! Client side of the remote indexing backend (Elasticsearch)

use crate::core::{Fields, LoggerError, Record, Result, TimestampFormat};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Document shape stored in the index, one per record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(rename = "Host")]
    pub host: String,
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Data")]
    pub data: Fields,
    #[serde(rename = "Level")]
    pub level: String,
}

impl IndexDocument {
    pub fn from_record(record: &Record, host: &str) -> Self {
        Self {
            host: host.to_string(),
            timestamp: TimestampFormat::Rfc3339Nanos.format(&record.time),
            message: record.message.clone(),
            data: record.fields.clone(),
            level: record.level.to_upper_str().to_string(),
        }
    }
}

/// Capability the remote sink needs from an indexing backend
pub trait IndexClient: Send + Sync {
    /// Check that at least one backend node is reachable and healthy
    fn ping(&self) -> Result<()>;

    /// Index a batch of documents
    fn bulk(&self, index: &str, documents: &[IndexDocument]) -> Result<()>;
}

/// Elasticsearch client over HTTP, trying nodes in the order given
pub struct HttpIndexClient {
    nodes: Vec<Url>,
    client: Client,
}

impl HttpIndexClient {
    /// Parse and validate endpoints such as `http://es-1:9200`
    pub fn new<S: AsRef<str>>(endpoints: &[S], timeout: Duration) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(LoggerError::config(
                "remote sink",
                "at least one endpoint is required",
            ));
        }

        let nodes = endpoints
            .iter()
            .map(|endpoint| {
                let endpoint = endpoint.as_ref();
                let url = Url::parse(endpoint).map_err(|e| LoggerError::endpoint(endpoint, e))?;
                if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
                    return Err(LoggerError::config(
                        "remote sink",
                        format!("'{}' is not an http(s) endpoint", endpoint),
                    ));
                }
                Ok(url)
            })
            .collect::<Result<Vec<_>>>()?;

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { nodes, client })
    }

    pub fn nodes(&self) -> &[Url] {
        &self.nodes
    }

    /// Newline-delimited bulk body: an action line followed by the document
    pub fn bulk_body(index: &str, documents: &[IndexDocument]) -> Result<String> {
        let action = serde_json::json!({ "index": { "_index": index } }).to_string();
        let mut body = String::new();
        for document in documents {
            body.push_str(&action);
            body.push('\n');
            body.push_str(&serde_json::to_string(document)?);
            body.push('\n');
        }
        Ok(body)
    }

    fn bulk_url(node: &Url) -> Result<Url> {
        let mut url = node.clone();
        url.path_segments_mut()
            .map_err(|_| LoggerError::config("remote sink", format!("'{}' has no path", node)))?
            .pop_if_empty()
            .push("_bulk");
        Ok(url)
    }

    fn node_list(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.as_str()).collect()
    }

    fn send_bulk(&self, node: &Url, body: &str) -> Result<()> {
        let response = self
            .client
            .post(Self::bulk_url(node)?)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body.to_string())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(LoggerError::remote_rejected(status.as_u16(), text));
        }

        let reply: serde_json::Value = response.json()?;
        if reply["errors"].as_bool().unwrap_or(false) {
            return Err(LoggerError::remote_rejected(
                status.as_u16(),
                "bulk request reported item errors",
            ));
        }
        Ok(())
    }
}

impl IndexClient for HttpIndexClient {
    fn ping(&self) -> Result<()> {
        let mut last_failure = String::from("no nodes configured");
        for node in &self.nodes {
            match self.client.get(node.clone()).send() {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => {
                    last_failure = format!("{} answered {}", node, response.status());
                }
                Err(e) => {
                    last_failure = format!("{}: {}", node, e);
                }
            }
        }
        Err(LoggerError::remote_unavailable(&self.node_list(), last_failure))
    }

    fn bulk(&self, index: &str, documents: &[IndexDocument]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let body = Self::bulk_body(index, documents)?;
        let mut last_err = None;
        for node in &self.nodes {
            match self.send_bulk(node, &body) {
                Ok(()) => return Ok(()),
                // The node answered; another node would reject the same payload.
                Err(e @ LoggerError::RemoteRejected { .. }) => return Err(e),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            LoggerError::remote_unavailable(&self.node_list(), "no nodes configured")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    fn document() -> IndexDocument {
        let record = Record::new(LogLevel::Warn, "disk almost full")
            .with_fields(Fields::new().with_field("serviceName", "orders"));
        IndexDocument::from_record(&record, "orders")
    }

    #[test]
    fn test_document_shape() {
        let value = serde_json::to_value(document()).unwrap();

        assert_eq!(value["Host"], "orders");
        assert_eq!(value["Message"], "disk almost full");
        assert_eq!(value["Level"], "WARNING");
        assert_eq!(value["Data"]["serviceName"], "orders");
        assert!(value["@timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_bulk_body() {
        let body = HttpIndexClient::bulk_body("huspluslog", &[document(), document()]).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r#"{"index":{"_index":"huspluslog"}}"#);
        let doc: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(doc["Message"], "disk almost full");
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_endpoint_validation() {
        let timeout = Duration::from_secs(1);
        let none: [&str; 0] = [];

        assert!(matches!(
            HttpIndexClient::new(&none, timeout),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            HttpIndexClient::new(&["es-1:9200 with spaces"], timeout),
            Err(LoggerError::InvalidEndpoint { .. }) | Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            HttpIndexClient::new(&["ftp://es-1:9200"], timeout),
            Err(LoggerError::InvalidConfiguration { .. })
        ));

        let client = HttpIndexClient::new(&["http://es-1:9200", "https://es-2:9200/"], timeout)
            .unwrap();
        assert_eq!(client.nodes().len(), 2);
    }

    #[test]
    fn test_bulk_url() {
        let node = Url::parse("http://es-1:9200").unwrap();
        assert_eq!(
            HttpIndexClient::bulk_url(&node).unwrap().as_str(),
            "http://es-1:9200/_bulk"
        );

        let node = Url::parse("http://gateway/es/").unwrap();
        assert_eq!(
            HttpIndexClient::bulk_url(&node).unwrap().as_str(),
            "http://gateway/es/_bulk"
        );
    }

    #[test]
    fn test_ping_unreachable_node() {
        let client = HttpIndexClient::new(&["http://127.0.0.1:1"], Duration::from_millis(500))
            .unwrap();
        let err = client.ping().unwrap_err();
        assert!(matches!(err, LoggerError::RemoteUnavailable { .. }));
    }
}
