use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Prometheus exposition for the decision counters emitted by the engine.
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global recorder. Fails if one is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        metrics::describe_counter!(
            "atendos_decisions_total",
            "Decisions returned, by outcome (auto_reply | escalated)"
        );
        metrics::describe_counter!(
            "atendos_escalations_total",
            "Escalation rules fired, by reason"
        );
        metrics::describe_counter!(
            "atendos_generation_failures_total",
            "Provider calls that produced no usable reply, by kind"
        );
        metrics::describe_histogram!(
            "atendos_generation_duration_ms",
            "Wall-clock time spent obtaining a reply, retries included"
        );

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
