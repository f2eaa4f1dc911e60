//! Prometheus metrics for workspace requests.
//!
//! Metrics are recorded through the `metrics` facade and rendered by the
//! Prometheus exporter on `/metrics`.

use metrics::{describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Histogram of workspace request latency.
pub const WORKSPACE_REQUEST_DURATION: &str = "workspace_request_duration_seconds";

/// Counter of errors returned to clients, by code and category.
pub const ERRORS_TOTAL: &str = "spaces_errors_total";

const DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

/// Handle onto the installed Prometheus recorder.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    prometheus_handle: Option<PrometheusHandle>,
}

impl MetricsRegistry {
    /// A registry with no recorder; renders nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.prometheus_handle.is_some()
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.prometheus_handle
            .as_ref()
            .map(|h| h.render())
            .unwrap_or_default()
    }
}

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn init_metrics(enabled: bool) -> anyhow::Result<MetricsRegistry> {
    if !enabled {
        return Ok(MetricsRegistry::disabled());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(DURATION_BUCKETS)?
        .install_recorder()?;

    describe_histogram!(
        WORKSPACE_REQUEST_DURATION,
        "Workspace request duration in seconds, by status code and verb"
    );
    describe_counter!(ERRORS_TOTAL, "Total errors by code and category");

    tracing::info!("Metrics initialized");

    Ok(MetricsRegistry {
        prometheus_handle: Some(handle),
    })
}

/// Verb label for workspace requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceVerb {
    Get,
    List,
}

impl WorkspaceVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::List => "list",
        }
    }
}

/// Times a workspace request from creation until [`finish`](Self::finish).
pub struct WorkspaceRequestTimer {
    start: Instant,
    verb: WorkspaceVerb,
}

impl WorkspaceRequestTimer {
    pub fn start(verb: WorkspaceVerb) -> Self {
        Self {
            start: Instant::now(),
            verb,
        }
    }

    /// Record the elapsed time under the response status code.
    pub fn finish(self, status_code: u16) {
        histogram!(
            WORKSPACE_REQUEST_DURATION,
            "status" => status_code.to_string(),
            "verb" => self.verb.as_str(),
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_registry_renders_empty() {
        let registry = init_metrics(false).unwrap();
        assert!(!registry.is_enabled());
        assert_eq!(registry.render(), "");
    }

    #[test]
    fn test_timer_without_recorder() {
        WorkspaceRequestTimer::start(WorkspaceVerb::List).finish(200);
        assert_eq!(WorkspaceVerb::Get.as_str(), "get");
    }
}
