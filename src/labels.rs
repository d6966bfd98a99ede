//! Label keys and metric set types produced by the upstream collection
//! pipeline.

/// Label carrying the kind of entity a metric set describes.
pub const LABEL_METRIC_SET_TYPE: &str = "type";
pub const LABEL_HOSTNAME: &str = "hostname";
pub const LABEL_NAMESPACE_NAME: &str = "namespace_name";
pub const LABEL_POD_NAME: &str = "pod_name";
pub const LABEL_CONTAINER_NAME: &str = "container_name";
/// Comma separated `key:value` user labels of the entity.
pub const LABEL_LABELS: &str = "labels";
/// Present on metrics scoped to a sub-resource, e.g. a filesystem device.
pub const LABEL_RESOURCE_ID: &str = "resourceId";

pub const METRIC_SET_TYPE_POD_CONTAINER: &str = "pod_container";
pub const METRIC_SET_TYPE_SYSTEM_CONTAINER: &str = "sys_container";
pub const METRIC_SET_TYPE_POD: &str = "pod";
pub const METRIC_SET_TYPE_NAMESPACE: &str = "ns";
pub const METRIC_SET_TYPE_NODE: &str = "node";
pub const METRIC_SET_TYPE_CLUSTER: &str = "cluster";

/// Kind of entity a metric set was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSetType {
    PodContainer,
    SystemContainer,
    Pod,
    Namespace,
    Node,
    Cluster,
}

impl MetricSetType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            METRIC_SET_TYPE_POD_CONTAINER => Some(Self::PodContainer),
            METRIC_SET_TYPE_SYSTEM_CONTAINER => Some(Self::SystemContainer),
            METRIC_SET_TYPE_POD => Some(Self::Pod),
            METRIC_SET_TYPE_NAMESPACE => Some(Self::Namespace),
            METRIC_SET_TYPE_NODE => Some(Self::Node),
            METRIC_SET_TYPE_CLUSTER => Some(Self::Cluster),
            _ => None,
        }
    }

    /// Value of the `type` meta tag for this kind.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::PodContainer => "container",
            Self::SystemContainer => "sys-container",
            Self::Pod => "pod",
            Self::Namespace => "namespace",
            Self::Node => "node",
            Self::Cluster => "cluster",
        }
    }
}
