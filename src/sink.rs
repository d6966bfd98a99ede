use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
    carbon2::{encode_payload, Carbon2Metric},
    config::SinkConfig,
    extract::MetricReading,
    metrics::{self, ExportTimer},
    models::DataBatch,
    transport::{HttpTransport, Transport},
    Result,
};

const SINK_NAME: &str = "Sumo Logic Sink";

/// Exports data batches to a Sumo Logic HTTP source as Carbon2 lines.
pub struct Carbon2Sink {
    config: SinkConfig,
    transport: Arc<dyn Transport>,
    export_lock: Mutex<()>,
}

impl Carbon2Sink {
    pub fn new(uri: &str) -> Result<Self> {
        let config = SinkConfig::from_uri(uri)?;
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new())))
    }

    pub fn with_transport(config: SinkConfig, transport: Arc<dyn Transport>) -> Self {
        info!(
            "Created {} for {} with {} dimensions",
            SINK_NAME,
            config.endpoint(),
            config.dimensions().len()
        );
        Self {
            config,
            transport,
            export_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        SINK_NAME
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    pub fn stop(&self) {
        info!("stopping {}", SINK_NAME);
    }

    /// Converts every metric of the batch into a Carbon2 record, in batch
    /// order. Labeled metrics without a numeric value are skipped.
    pub fn build_records(&self, batch: &DataBatch) -> Vec<Carbon2Metric> {
        let timestamp = batch.timestamp.timestamp();
        let mut records = Vec::new();

        for (set_key, metric_set) in &batch.metric_sets {
            debug!("Extracting metric set {}", set_key);

            for (name, value) in &metric_set.metric_values {
                let reading = MetricReading::new(
                    name.clone(),
                    value.clone(),
                    metric_set.labels.clone(),
                    timestamp,
                );
                records.push(reading.to_carbon2(&self.config));
            }

            for metric in &metric_set.labeled_metrics {
                if let Some(value) = metric.value() {
                    let mut labels = metric_set.labels.clone();
                    labels.extend(metric.labels.clone());
                    let reading =
                        MetricReading::new(metric.name.clone(), value.clone(), labels, timestamp);
                    records.push(reading.to_carbon2(&self.config));
                }
            }
        }

        records
    }

    /// Sends the whole batch in a single POST.
    ///
    /// Concurrent calls are serialized per sink. A non-200 answer is logged
    /// and swallowed; only request build and send failures are returned, and
    /// those are fatal (see [`crate::SinkError::is_fatal`]).
    pub async fn export_data(&self, batch: &DataBatch) -> Result<()> {
        let _guard = self.export_lock.lock().await;
        let _timer = ExportTimer::new();

        let records = self.build_records(batch);
        info!("Sending {} metrics to Sumo Logic", records.len());

        let payload = encode_payload(&records);
        metrics::record_sent(records.len(), payload.len());

        let response = match self.transport.post(self.config.endpoint(), payload).await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_failure();
                error!("Failed to export {} metrics: {}", records.len(), e);
                return Err(e);
            }
        };

        if response.status != 200 {
            metrics::record_rejection();
            error!(
                "unable to send data to Sumo Logic, got back status code {}. response:{}",
                response.status, response.body
            );
        }

        Ok(())
    }
}
