use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use prometheus::Encoder;

use crate::metrics::REGISTRY;

pub async fn metrics_handler() -> Response {
    let encoder = prometheus::TextEncoder::new();

    let mut metrics = encode(&encoder, &REGISTRY.gather());
    metrics.push_str(&encode(&encoder, &prometheus::gather()));

    (StatusCode::OK, metrics).into_response()
}

fn encode(encoder: &prometheus::TextEncoder, families: &[prometheus::proto::MetricFamily]) -> String {
    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(families, &mut buffer) {
        log::error!("Could not encode metrics. Error: '{error}'.");
    };
    String::from_utf8(buffer).unwrap_or_else(|error| {
        log::error!("Metrics could not be from_utf8'd. Error: '{error}'.");
        String::default()
    })
}
