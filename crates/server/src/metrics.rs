//! Prometheus metrics

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

use isl_gloss_pipeline::StageTimings;

use crate::ServerError;

/// Global Prometheus handle
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder
///
/// Call once at startup, before any request is served.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Internal(format!("failed to install Prometheus recorder: {}", e)))?;

    register_default_metrics();

    METRICS_HANDLE.get_or_init(|| handle.clone());
    Ok(handle)
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

fn register_default_metrics() {
    counter!("isl_gloss_requests_total", "endpoint" => "translate").absolute(0);
    counter!("isl_gloss_requests_total", "endpoint" => "translate_audio").absolute(0);

    counter!("isl_gloss_errors_total", "code" => "INVALID_REQUEST").absolute(0);
    counter!("isl_gloss_errors_total", "code" => "ANNOTATION_UNAVAILABLE").absolute(0);
    counter!("isl_gloss_errors_total", "code" => "TRANSCRIPTION_UNAVAILABLE").absolute(0);
    counter!("isl_gloss_errors_total", "code" => "INTERNAL_ERROR").absolute(0);
}

pub fn record_request(endpoint: &'static str) {
    counter!("isl_gloss_requests_total", "endpoint" => endpoint).increment(1);
}

pub fn record_error(code: &'static str) {
    counter!("isl_gloss_errors_total", "code" => code).increment(1);
}

/// Record per-stage latency and gloss length for a completed request
pub fn record_translation(timings: &StageTimings, gloss_len: usize) {
    if let Some(d) = timings.transcription {
        histogram!("isl_gloss_transcription_duration_seconds").record(d.as_secs_f64());
    }
    if let Some(d) = timings.annotation {
        histogram!("isl_gloss_annotation_duration_seconds").record(d.as_secs_f64());
    }
    if let Some(d) = timings.mapping {
        histogram!("isl_gloss_mapping_duration_seconds").record(d.as_secs_f64());
    }
    histogram!("isl_gloss_total_latency_seconds").record(timings.total().as_secs_f64());
    histogram!("isl_gloss_gloss_tokens").record(gloss_len as f64);
}

/// Metrics endpoint handler
pub async fn metrics_handler() -> impl IntoResponse {
    match get_metrics_handle() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_metric_helpers() {
        // No recorder installed; these must be no-ops
        record_request("translate");
        record_error("INVALID_REQUEST");
        record_translation(
            &StageTimings {
                transcription: None,
                annotation: Some(Duration::from_millis(12)),
                mapping: Some(Duration::from_micros(40)),
            },
            3,
        );
    }
}
