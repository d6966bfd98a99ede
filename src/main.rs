use std::process;
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use carbon2_sink::{logging, server, Carbon2Sink, DataBatch, HostConfig, Result};

const COMPONENT: &str = "carbon2_sink";

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init_logger(COMPONENT) {
        eprintln!("{}", e);
    }

    // Sink errors that reach this point are fatal transport or config errors.
    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = HostConfig::from_env()?;
    let sink = Carbon2Sink::new(&config.sink_uri)?;

    if let Some(port) = config.metrics_port {
        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        tokio::spawn(async move {
            if let Err(e) = server::serve_metrics(listener).await {
                error!("Metrics server stopped: {}", e);
            }
        });
    }

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &config.batch_file {
        Some(path) => Box::new(BufReader::new(File::open(path).await?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut exported = 0usize;
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let batch = match DataBatch::from_json(&line) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Skipping malformed batch: {}", e);
                continue;
            }
        };

        sink.export_data(&batch).await?;
        exported += 1;
    }

    info!("Exported {} batches", exported);
    sink.stop();
    Ok(())
}
