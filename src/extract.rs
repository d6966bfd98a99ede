//! Tag extraction: maps one reading and its entity labels onto Carbon2
//! intrinsic and meta tags.

use tracing::info;

use crate::carbon2::{Carbon2Metric, Tags};
use crate::config::SinkConfig;
use crate::labels::{
    MetricSetType, LABEL_CONTAINER_NAME, LABEL_HOSTNAME, LABEL_LABELS, LABEL_METRIC_SET_TYPE,
    LABEL_NAMESPACE_NAME, LABEL_POD_NAME, LABEL_RESOURCE_ID,
};
use crate::models::{Labels, MetricValue};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    /// Non-empty; the upstream pipeline never emits unnamed metrics. An empty
    /// name is passed through and yields an empty `metric` tag.
    pub name: String,
    pub value: MetricValue,
    pub labels: Labels,
    /// Unix seconds.
    pub timestamp: i64,
}

impl MetricReading {
    pub fn new(name: impl Into<String>, value: MetricValue, labels: Labels, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            value,
            labels,
            timestamp,
        }
    }

    pub fn intrinsic_tags(&self) -> Tags {
        let mut tags = Tags::new();
        tags.insert("metric".to_string(), self.metric_path());

        if let Some(kind) = self.labels.get(LABEL_METRIC_SET_TYPE) {
            match MetricSetType::parse(kind) {
                Some(MetricSetType::PodContainer) => {
                    tags.insert("node".to_string(), self.label(LABEL_HOSTNAME));
                    tags.insert("namespace".to_string(), self.label(LABEL_NAMESPACE_NAME));
                    tags.insert("pod".to_string(), self.label(LABEL_POD_NAME));
                    tags.insert("container".to_string(), self.label(LABEL_CONTAINER_NAME));
                }
                Some(MetricSetType::SystemContainer) => {
                    tags.insert("node".to_string(), self.label(LABEL_HOSTNAME));
                    tags.insert("sys-containers".to_string(), self.label(LABEL_CONTAINER_NAME));
                }
                Some(MetricSetType::Pod) => {
                    tags.insert("node".to_string(), self.label(LABEL_HOSTNAME));
                    tags.insert("namespace".to_string(), self.label(LABEL_NAMESPACE_NAME));
                    tags.insert("pod".to_string(), self.label(LABEL_POD_NAME));
                }
                Some(MetricSetType::Namespace) => {
                    tags.insert("namespace".to_string(), self.label(LABEL_NAMESPACE_NAME));
                }
                Some(MetricSetType::Node) => {
                    tags.insert("node".to_string(), self.label(LABEL_HOSTNAME));
                }
                Some(MetricSetType::Cluster) => {}
                None => info!("Unknown metric type {}", kind),
            }
        }

        tags
    }

    pub fn meta_tags(&self) -> Tags {
        let mut tags = Tags::new();

        for entry in self.label(LABEL_LABELS).split(',') {
            let parts: Vec<&str> = entry.split(':').collect();
            if let [key, value] = parts.as_slice() {
                if !value.is_empty() {
                    tags.insert(key.to_string(), value.to_string());
                }
            }
        }

        if let Some(kind) = self.labels.get(LABEL_METRIC_SET_TYPE) {
            match MetricSetType::parse(kind) {
                Some(set_type) => {
                    tags.insert("type".to_string(), set_type.type_tag().to_string());
                }
                None => info!("Unknown metric type {}", kind),
            }
        }

        tags
    }

    /// Integers print plainly, floats with six decimals, anything else empty.
    /// Non-finite floats are spelled `+Inf`, `-Inf` and `NaN`.
    pub fn formatted_value(&self) -> String {
        match self.value {
            MetricValue::Int(value) => value.to_string(),
            MetricValue::Float(value) if value.is_nan() => "NaN".to_string(),
            MetricValue::Float(value) if value.is_infinite() => {
                let sign = if value > 0.0 { '+' } else { '-' };
                format!("{}Inf", sign)
            }
            MetricValue::Float(value) => format!("{:.6}", value),
            MetricValue::Unknown => String::new(),
        }
    }

    /// Builds the wire record, overlaying the sink dimensions onto both tag
    /// sets. Sink metadata is not applied.
    pub fn to_carbon2(&self, config: &SinkConfig) -> Carbon2Metric {
        let mut intrinsic_tags = self.intrinsic_tags();
        let mut meta_tags = self.meta_tags();
        for (key, value) in config.dimensions() {
            intrinsic_tags.insert(key.clone(), value.clone());
            meta_tags.insert(key.clone(), value.clone());
        }

        Carbon2Metric::new(intrinsic_tags, meta_tags, self.formatted_value(), self.timestamp)
    }

    fn metric_path(&self) -> String {
        let path = match self.labels.get(LABEL_RESOURCE_ID) {
            Some(resource_id) => {
                let mut parts = self.name.split('/');
                let section = parts.next().unwrap_or_default();
                std::iter::once(section)
                    .chain(std::iter::once(resource_id.as_str()))
                    .chain(parts)
                    .collect::<Vec<_>>()
                    .join(".")
            }
            None => self.name.clone(),
        };
        path.replace('/', ".")
    }

    fn label(&self, key: &str) -> String {
        self.labels.get(key).cloned().unwrap_or_default()
    }
}
