//! Prometheus metrics

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use support_agent_core::Sentiment;

use crate::state::AppState;

/// Install the global Prometheus recorder
///
/// Returns `None` if a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        },
    }
}

pub fn record_turn(intent: &str, sentiment: Sentiment, latency: Duration) {
    metrics::counter!(
        "support_agent_turns_total",
        "intent" => intent.to_string(),
        "sentiment" => sentiment.as_str()
    )
    .increment(1);
    metrics::histogram!("support_agent_turn_latency_seconds").record(latency.as_secs_f64());
}

pub fn record_escalation() {
    metrics::counter!("support_agent_escalations_total").increment(1);
}

pub fn record_session_cleared() {
    metrics::counter!("support_agent_sessions_cleared_total").increment(1);
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Metrics disabled").into_response(),
    }
}
