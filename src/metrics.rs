use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder,
};
use std::time::Instant;

use crate::Result;

lazy_static! {
    // Export metrics
    pub static ref EXPORTS_TOTAL: IntCounter = register_int_counter!(
        "carbon2_exports_total",
        "Total number of exports that acquired the sink lock"
    ).unwrap();

    pub static ref RECORDS_SENT: IntCounter = register_int_counter!(
        "carbon2_records_sent_total",
        "Total number of Carbon2 records handed to the transport"
    ).unwrap();

    pub static ref EXPORT_REJECTIONS: IntCounter = register_int_counter!(
        "carbon2_export_rejections_total",
        "Total number of exports the endpoint answered with a non-200 status"
    ).unwrap();

    pub static ref EXPORT_FAILURES: IntCounter = register_int_counter!(
        "carbon2_export_failures_total",
        "Total number of exports that failed to build or send the request"
    ).unwrap();

    pub static ref PAYLOAD_BYTES: Histogram = register_histogram!(
        "carbon2_payload_bytes",
        "Size of the Carbon2 payload per export",
        vec![256.0, 1024.0, 16384.0, 131072.0, 1048576.0, 8388608.0]
    ).unwrap();

    pub static ref EXPORT_DURATION: Histogram = register_histogram!(
        "carbon2_export_duration_seconds",
        "Export duration in seconds, from acquiring the sink lock to the response",
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0]
    ).unwrap();
}

/// Counts an export on creation and observes its duration on drop.
pub struct ExportTimer {
    start: Instant,
}

impl ExportTimer {
    pub fn new() -> Self {
        EXPORTS_TOTAL.inc();
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for ExportTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ExportTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        EXPORT_DURATION.observe(duration);
    }
}

pub fn record_sent(records: usize, payload_bytes: usize) {
    RECORDS_SENT.inc_by(records as u64);
    PAYLOAD_BYTES.observe(payload_bytes as f64);
}

pub fn record_rejection() {
    EXPORT_REJECTIONS.inc();
}

pub fn record_failure() {
    EXPORT_FAILURES.inc();
}

/// Renders the default registry in the text exposition format.
pub fn gather_text() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| crate::SinkError::Internal(e.to_string()))
}
