//! Structured logging with JSON, pretty and compact formats.
//!
//! - JSON for production environments
//! - Pretty for development
//! - Per-module level overrides on top of the global level

use serde::Deserialize;
use std::collections::HashMap;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::ObservabilityConfig;

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Global log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module log levels
    #[serde(default)]
    pub module_levels: HashMap<String, String>,

    /// Whether to include file/line information
    #[serde(default = "default_include_location")]
    pub include_location: bool,

    /// Whether to include thread information
    #[serde(default)]
    pub include_thread: bool,

    /// Whether to include target (module path)
    #[serde(default = "default_include_target")]
    pub include_target: bool,

    /// Emit an event when a span closes (carries its duration)
    #[serde(default = "default_span_close_events")]
    pub span_close_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            module_levels: HashMap::new(),
            include_location: default_include_location(),
            include_thread: false,
            include_target: default_include_target(),
            span_close_events: default_span_close_events(),
        }
    }
}

impl From<&ObservabilityConfig> for LoggingConfig {
    fn from(observability: &ObservabilityConfig) -> Self {
        Self {
            level: observability.log_level.clone(),
            format: observability.log_format.clone().unwrap_or(if observability.json_logging {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            }),
            module_levels: observability.log_modules.clone(),
            include_thread: observability.log_thread,
            ..Self::default()
        }
    }
}

impl LoggingConfig {
    /// Build the filter from the global level and module overrides.
    pub fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)?;
        for (module, level) in &self.module_levels {
            filter = filter.add_directive(format!("{}={}", module, level).parse()?);
        }
        Ok(filter)
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_close_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format for production/structured logging
    #[default]
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact single-line format
    Compact,
}

// Default value functions
fn default_log_level() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

fn default_include_location() -> bool {
    true
}

fn default_include_target() -> bool {
    true
}

fn default_span_close_events() -> bool {
    true
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a filter directive is invalid or a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = config.env_filter()?;

    let base = fmt::layer()
        .with_span_events(config.span_events())
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_thread_ids(config.include_thread)
        .with_thread_names(config.include_thread)
        .with_target(config.include_target);

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.include_location);
        assert!(config.span_close_events);
    }

    #[test]
    fn test_from_observability() {
        let observability = ObservabilityConfig {
            log_level: "debug".into(),
            json_logging: false,
            metrics_enabled: false,
            ..ObservabilityConfig::default()
        };
        let config = LoggingConfig::from(&observability);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.module_levels.is_empty());
        assert!(!config.include_thread);
    }

    #[test]
    fn test_from_observability_explicit_format_and_modules() {
        let mut observability = ObservabilityConfig {
            log_format: Some(LogFormat::Compact),
            log_thread: true,
            ..ObservabilityConfig::default()
        };
        observability
            .log_modules
            .insert("spaces_core::source".into(), "trace".into());

        let config = LoggingConfig::from(&observability);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.include_thread);
        assert_eq!(config.module_levels["spaces_core::source"], "trace");
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_module_levels_build_filter() {
        let mut config = LoggingConfig {
            level: "warn".into(),
            ..LoggingConfig::default()
        };
        config
            .module_levels
            .insert("spaces_core::workspace".into(), "debug".into());
        assert!(config.env_filter().is_ok());

        config.module_levels.insert("bad".into(), "not a level!".into());
        assert!(config.env_filter().is_err());
    }
}
