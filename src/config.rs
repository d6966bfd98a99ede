use reqwest::Url;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use tracing::info;

use crate::{Result, SinkError};

const DIMENSIONS_PARAM: &str = "dimensions";
const METADATA_PARAM: &str = "metadata";

/// Immutable sink settings, parsed once from the sink URI.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    endpoint: String,
    dimensions: BTreeMap<String, String>,
    metadata: BTreeMap<String, String>,
}

impl SinkConfig {
    pub fn new(
        endpoint: impl Into<String>,
        dimensions: BTreeMap<String, String>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            dimensions,
            metadata,
        }
    }

    /// Parses `scheme://host/path?dimensions=k=v,..&metadata=k=v,..`.
    ///
    /// Only scheme, host and path make up the endpoint; credentials, query
    /// and fragment are dropped. The endpoint is in normalized URL form: the
    /// host is lowercased, a default port is omitted and an empty path
    /// becomes `/`. `metadata` is read only when `dimensions` is non-empty.
    /// An entry with several `=` keeps the text between the first two.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let parsed = Url::parse(uri)
            .map_err(|e| SinkError::Config(format!("invalid sink uri {}: {}", uri, e)))?;

        let dimensions_param = query_param(&parsed, DIMENSIONS_PARAM);
        let metadata_param = query_param(&parsed, METADATA_PARAM);

        let mut dimensions = BTreeMap::new();
        if !dimensions_param.is_empty() {
            dimensions = parse_pairs(DIMENSIONS_PARAM, &dimensions_param)?;
        }

        let mut metadata = BTreeMap::new();
        if !dimensions_param.is_empty() && !metadata_param.is_empty() {
            metadata = parse_pairs(METADATA_PARAM, &metadata_param)?;
        }

        let mut endpoint = parsed;
        endpoint.set_query(None);
        endpoint.set_fragment(None);
        // Not fatal for urls that cannot carry credentials in the first place.
        let _ = endpoint.set_username("");
        let _ = endpoint.set_password(None);

        Ok(Self {
            endpoint: endpoint.to_string(),
            dimensions,
            metadata,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Static tags written into both tag sets of every record.
    pub fn dimensions(&self) -> &BTreeMap<String, String> {
        &self.dimensions
    }

    /// Parsed from the URI but not applied to exported records.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

fn query_param(url: &Url, name: &str) -> String {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn parse_pairs(param: &str, raw: &str) -> Result<BTreeMap<String, String>> {
    let mut pairs = BTreeMap::new();
    for entry in raw.split(',') {
        let mut parts = entry.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().ok_or_else(|| {
            SinkError::Config(format!("malformed {} entry '{}', expected key=value", param, entry))
        })?;
        pairs.insert(key.to_string(), value.to_string());
    }
    Ok(pairs)
}

/// Settings of the host process, read from the environment.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub sink_uri: String,
    pub batch_file: Option<PathBuf>,
    pub metrics_port: Option<u16>,
}

impl HostConfig {
    /// Environment variables:
    /// - SINK_URI: sink URI (required)
    /// - BATCH_FILE: newline delimited JSON batches (default: stdin)
    /// - METRICS_PORT: serve self metrics on this port (optional)
    pub fn from_env() -> Result<Self> {
        let sink_uri = env::var("SINK_URI")
            .map_err(|_| SinkError::Config("SINK_URI is required".to_string()))?;

        let batch_file = env::var("BATCH_FILE").ok().map(PathBuf::from);

        let metrics_port = match env::var("METRICS_PORT") {
            Ok(port) => Some(port.parse().map_err(|e| {
                SinkError::Config(format!("invalid METRICS_PORT {}: {}", port, e))
            })?),
            Err(_) => None,
        };

        info!(
            "Loaded host config: batch_file={:?}, metrics_port={:?}",
            batch_file, metrics_port
        );

        Ok(Self {
            sink_uri,
            batch_file,
            metrics_port,
        })
    }
}
