//! Configuration management.

use serde::Deserialize;
use std::collections::HashMap;

use crate::model::PUBLIC_VIEWER_USERNAME;
use crate::telemetry::logging::LogFormat;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer token verification
    #[serde(default)]
    pub auth: AuthConfig,

    /// Public (community) viewer access
    #[serde(default)]
    pub public_viewer: PublicViewerConfig,

    /// Backing store for the in-memory collaborators
    #[serde(default)]
    pub store: StoreConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 shared secret
    #[serde(default)]
    pub jwt_secret: String,

    /// Expected `iss` claim; not checked when unset
    pub issuer: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: None,
        }
    }
}

/// Public-viewer settings handed to the identity resolver and access checks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicViewerConfig {
    /// Whether community access is enabled
    #[serde(default)]
    pub enabled: bool,

    /// MasterUserRecord name that public bindings are granted to
    #[serde(default = "default_public_viewer_username")]
    pub username: String,
}

impl PublicViewerConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            username: default_public_viewer_username(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

impl Default for PublicViewerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            username: default_public_viewer_username(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// JSON fixture file loaded at startup; an empty store is used when unset
    pub fixtures_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Log format (json, pretty, compact); takes precedence over `json_logging`
    #[serde(default)]
    pub log_format: Option<LogFormat>,

    /// Per-module log levels, e.g. `spaces_core::workspace = "debug"`
    #[serde(default)]
    pub log_modules: HashMap<String, String>,

    /// Include thread ids and names in log lines
    #[serde(default)]
    pub log_thread: bool,

    /// Install the Prometheus recorder
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            log_format: None,
            log_modules: HashMap::new(),
            log_thread: false,
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_public_viewer_username() -> String { PUBLIC_VIEWER_USERNAME.to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_enabled() -> bool { true }

impl Config {
    /// Load configuration from environment.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("SPACES").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with environment overrides.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("SPACES").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret must be set");
        }
        if self.public_viewer.enabled && self.public_viewer.username.is_empty() {
            anyhow::bail!("public_viewer.username must not be empty when public viewer is enabled");
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bind_address(), "0.0.0.0:8080");
        assert!(!cfg.public_viewer.enabled);
        assert_eq!(cfg.public_viewer.username, "kubesaw-authenticated");
        assert!(cfg.store.fixtures_path.is_none());
        assert_eq!(cfg.observability.log_level, "info");
    }

    #[test]
    fn test_missing_secret_rejected() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[auth]
jwt_secret = "s3cr3t"

[public_viewer]
enabled = true
"#
        )
        .unwrap();

        let cfg = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.auth.jwt_secret, "s3cr3t");
        assert_eq!(cfg.public_viewer, PublicViewerConfig::enabled());
    }

    #[test]
    fn test_logging_section_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[auth]
jwt_secret = "s3cr3t"

[observability]
log_format = "compact"
log_thread = true

[observability.log_modules]
"spaces_core::workspace" = "debug"
"#
        )
        .unwrap();

        let cfg = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.observability.log_format, Some(LogFormat::Compact));
        assert!(cfg.observability.log_thread);
        assert_eq!(
            cfg.observability.log_modules.get("spaces_core::workspace"),
            Some(&"debug".to_string())
        );
    }

    #[test]
    fn test_empty_public_viewer_username_rejected() {
        let mut cfg = Config::default();
        cfg.auth.jwt_secret = "s3cr3t".into();
        cfg.public_viewer = PublicViewerConfig {
            enabled: true,
            username: String::new(),
        };
        assert!(cfg.validate().is_err());
    }
}
