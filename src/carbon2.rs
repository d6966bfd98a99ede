//! Carbon2 wire records.
//!
//! One record per line: intrinsic tags, a blank, meta tags, value, timestamp.
//!
//! ```text
//! metric=cpu.usage node=n1  type=node 42 1704067200
//! ```

use std::collections::BTreeMap;
use std::fmt;

pub const CARBON2_CONTENT_TYPE: &str = "application/vnd.sumologic.carbon2";

pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Carbon2Metric {
    pub intrinsic_tags: Tags,
    pub meta_tags: Tags,
    pub value: String,
    pub timestamp: i64,
}

impl Carbon2Metric {
    pub fn new(intrinsic_tags: Tags, meta_tags: Tags, value: String, timestamp: i64) -> Self {
        Self {
            intrinsic_tags,
            meta_tags,
            value,
            timestamp,
        }
    }
}

impl fmt::Display for Carbon2Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.intrinsic_tags {
            write!(f, "{}={} ", key, value)?;
        }
        f.write_str(" ")?;
        for (key, value) in &self.meta_tags {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{} {}", self.value, self.timestamp)
    }
}

/// Joins records into one newline-terminated payload.
pub fn encode_payload(metrics: &[Carbon2Metric]) -> String {
    let mut buffer = String::new();
    for metric in metrics {
        buffer.push_str(&metric.to_string());
        buffer.push('\n');
    }
    buffer
}
