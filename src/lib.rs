pub mod carbon2;
pub mod config;
pub mod error;
pub mod extract;
pub mod labels;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod server;
pub mod sink;
pub mod transport;

pub use carbon2::{Carbon2Metric, CARBON2_CONTENT_TYPE};
pub use config::{HostConfig, SinkConfig};
pub use error::{Result, SinkError};
pub use extract::MetricReading;
pub use models::{DataBatch, LabeledMetric, Labels, MetricSet, MetricValue};
pub use sink::Carbon2Sink;
pub use transport::{HttpTransport, Transport, TransportResponse};
