use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Result;

/// Label key to value mapping describing a monitored entity.
pub type Labels = BTreeMap<String, String>;

/// A single numeric observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    /// Any value kind the sink has no textual form for.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMetric {
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
    pub value: MetricValue,
}

impl LabeledMetric {
    /// The value, if it is of a numeric kind.
    pub fn value(&self) -> Option<&MetricValue> {
        match self.value {
            MetricValue::Int(_) | MetricValue::Float(_) => Some(&self.value),
            MetricValue::Unknown => None,
        }
    }
}

/// Readings that share one entity's label context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub metric_values: BTreeMap<String, MetricValue>,
    #[serde(default)]
    pub labeled_metrics: Vec<LabeledMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBatch {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metric_sets: BTreeMap<String, MetricSet>,
}

impl DataBatch {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            metric_sets: BTreeMap::new(),
        }
    }

    /// Decodes one JSON encoded batch.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
