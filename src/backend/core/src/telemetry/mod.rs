//! Telemetry: structured logging and Prometheus metrics.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, MetricsRegistry, WorkspaceRequestTimer, WorkspaceVerb, ERRORS_TOTAL,
    WORKSPACE_REQUEST_DURATION,
};

use crate::config::ObservabilityConfig;

/// Initialize logging and metrics from the observability settings.
pub fn init_telemetry(config: &ObservabilityConfig) -> anyhow::Result<MetricsRegistry> {
    init_logging(&LoggingConfig::from(config))?;
    init_metrics(config.metrics_enabled)
}
