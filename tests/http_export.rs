use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use carbon2_sink::{
    Carbon2Sink, DataBatch, LabeledMetric, Labels, MetricSet, MetricValue, CARBON2_CONTENT_TYPE,
};

#[derive(Clone)]
struct Receiver {
    status: StatusCode,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

async fn receive(
    State(receiver): State<Receiver>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    receiver.requests.lock().unwrap().push((content_type, body));
    (receiver.status, "quota exceeded")
}

async fn start_receiver(status: StatusCode) -> (SocketAddr, Arc<Mutex<Vec<(String, String)>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = Receiver {
        status,
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/receiver/v1/http/token", post(receive))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, requests)
}

fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn pod_batch() -> DataBatch {
    let mut batch = DataBatch::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

    let mut pod = MetricSet {
        labels: labels(&[
            ("type", "pod"),
            ("hostname", "worker-1"),
            ("namespace_name", "default"),
            ("pod_name", "web-0"),
            ("labels", "app:web,tier:,bad"),
        ]),
        ..Default::default()
    };
    pod.metric_values
        .insert("memory/usage".to_string(), MetricValue::Int(1024));
    pod.metric_values
        .insert("network/status".to_string(), MetricValue::Unknown);
    pod.labeled_metrics.push(LabeledMetric {
        name: "custom/latency".to_string(),
        labels: labels(&[("pod_name", "web-0-sidecar")]),
        value: MetricValue::Float(1.5),
    });
    batch.metric_sets.insert("pod:default/web-0".to_string(), pod);
    batch
}

#[tokio::test]
async fn test_export_over_http() {
    let (addr, requests) = start_receiver(StatusCode::OK).await;
    let sink = Carbon2Sink::new(&format!(
        "http://{}/receiver/v1/http/token?dimensions=cluster=prod&metadata=team=infra",
        addr
    ))
    .unwrap();

    sink.export_data(&pod_batch()).await.unwrap();

    let requests = requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);

    let (content_type, body) = &requests[0];
    assert_eq!(content_type, CARBON2_CONTENT_TYPE);

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines,
        vec![
            "cluster=prod metric=memory.usage namespace=default node=worker-1 pod=web-0  \
             app=web cluster=prod type=pod 1024 1709294400",
            "cluster=prod metric=network.status namespace=default node=worker-1 pod=web-0  \
             app=web cluster=prod type=pod  1709294400",
            "cluster=prod metric=custom.latency namespace=default node=worker-1 pod=web-0-sidecar  \
             app=web cluster=prod type=pod 1.500000 1709294400",
        ]
    );
    assert!(!body.contains("team=infra"));
    assert!(body.ends_with('\n'));
}

#[tokio::test]
async fn test_rejected_export_returns_normally() {
    let (addr, requests) = start_receiver(StatusCode::TOO_MANY_REQUESTS).await;
    let sink = Carbon2Sink::new(&format!("http://{}/receiver/v1/http/token", addr)).unwrap();

    sink.export_data(&pod_batch()).await.unwrap();
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_batch_sends_empty_body() {
    let (addr, requests) = start_receiver(StatusCode::OK).await;
    let sink = Carbon2Sink::new(&format!("http://{}/receiver/v1/http/token", addr)).unwrap();

    let empty = DataBatch::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    sink.export_data(&empty).await.unwrap();

    let requests = requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1, "");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_fatal() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sink = Carbon2Sink::new(&format!("http://{}/receiver/v1/http/token", addr)).unwrap();
    let err = sink.export_data(&pod_batch()).await.unwrap_err();
    assert!(err.is_fatal());
}
