//! Health check command.
//!
//! Queries the `/health` endpoint and, on request, the workspace request
//! metrics.

use anyhow::Result;
use clap::Args;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

const METRIC_PREFIXES: &[&str] = &["workspace_request_duration_seconds", "spaces_errors_total"];

#[derive(Args)]
pub struct HealthArgs {
    /// Also show workspace request metrics
    #[arg(short, long)]
    metrics: bool,
}

/// Keep the sample lines of the service's own metrics.
fn service_metric_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|l| !l.starts_with('#'))
        .filter(|l| METRIC_PREFIXES.iter().any(|p| l.starts_with(p)))
        .collect()
}

pub async fn execute(args: HealthArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: serde_json::Value = client.get_raw("/health").await?;

    match format {
        OutputFormat::Table => {
            let status = health
                .get("status")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");

            output::print_header("System Health");
            output::print_detail("Status", status);
            output::print_detail("API URL", client.base_url());

            if let Some(version) = health.get("version").and_then(|v| v.as_str()) {
                output::print_detail("Version", version);
            }

            if let Some(ts) = health.get("timestamp").and_then(|v| v.as_str()) {
                output::print_detail("Timestamp", ts);
            }

            if args.metrics {
                let text = client.get_text("/metrics").await?;
                output::print_header("Metrics");
                let lines = service_metric_lines(&text);
                if lines.is_empty() {
                    output::print_info("No workspace requests recorded yet.");
                }
                for line in lines {
                    println!("  {}", line);
                }
            }

            if status == "healthy" {
                output::print_success("All systems operational");
            } else {
                output::print_error(&format!("System status: {}", status));
            }
        }
        _ => output::print_item(&health, format)?,
    }

    Ok(())
}
