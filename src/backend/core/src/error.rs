//! Error handling for Spaces Core.
//!
//! This module provides:
//! - A single error type carrying a machine-readable [`ErrorCode`]
//! - HTTP status code mapping for API responses
//! - Client-safe messages separated from internal detail
//! - Error logging with tracing integration and an error counter
//!
//! # Usage
//!
//! ```rust,ignore
//! use spaces_core::error::{ErrorCode, ErrorContext, Result};
//!
//! fn load() -> Result<String> {
//!     let raw = std::fs::read_to_string("fixtures.json")
//!         .context(ErrorCode::InvalidFixture, "unable to read fixtures")?;
//!     Ok(raw)
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

use crate::telemetry::metrics::ERRORS_TOTAL;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for Spaces operations.
pub type Result<T> = std::result::Result<T, SpacesError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Not Found (1000-1099)
    WorkspaceNotFound,
    SpaceNotFound,
    TierNotFound,

    // Integrity (1100-1199)
    DuplicateSpaceBinding,
    IncompleteBindingLabels,

    // Upstream (2000-2099)
    UpstreamUnavailable,
    NoMemberClusters,

    // Configuration (5000-5099)
    InvalidFixture,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::WorkspaceNotFound => 1000,
            Self::SpaceNotFound => 1001,
            Self::TierNotFound => 1002,

            Self::DuplicateSpaceBinding => 1100,
            Self::IncompleteBindingLabels => 1101,

            Self::UpstreamUnavailable => 2000,
            Self::NoMemberClusters => 2001,

            Self::InvalidFixture => 5001,
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Integrity violations are reported as internal errors: they describe
    /// corrupted state the caller cannot fix by retrying differently.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::WorkspaceNotFound | Self::SpaceNotFound | Self::TierNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::DuplicateSpaceBinding
            | Self::IncompleteBindingLabels
            | Self::UpstreamUnavailable
            | Self::NoMemberClusters
            | Self::InvalidFixture => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this code belongs to the not-found family.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WorkspaceNotFound | Self::SpaceNotFound | Self::TierNotFound
        )
    }

    /// Get the error category for grouping.
    pub const fn category(&self) -> &'static str {
        match self.numeric_code() {
            1000..=1099 => "not_found",
            1100..=1199 => "integrity",
            2000..=2099 => "upstream",
            5000..=5099 => "configuration",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Severity
// ═══════════════════════════════════════════════════════════════════════════════

/// Severity level for errors (affects logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Expected outcomes such as a missing resource
    Low,
    /// Collaborator failures
    High,
    /// Corrupted data or broken invariants
    Critical,
}

impl ErrorSeverity {
    /// Get severity based on error code.
    pub const fn from_code(code: &ErrorCode) -> Self {
        match code {
            ErrorCode::WorkspaceNotFound
            | ErrorCode::SpaceNotFound
            | ErrorCode::TierNotFound => Self::Low,

            ErrorCode::UpstreamUnavailable
            | ErrorCode::NoMemberClusters
            | ErrorCode::InvalidFixture => Self::High,

            ErrorCode::DuplicateSpaceBinding | ErrorCode::IncompleteBindingLabels => {
                Self::Critical
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main Error Type
// ═══════════════════════════════════════════════════════════════════════════════

/// The main error type for Spaces Core.
#[derive(Error, Debug)]
pub struct SpacesError {
    /// Machine-readable error code
    code: ErrorCode,

    /// Message safe to expose to clients
    user_message: Cow<'static, str>,

    /// Detailed internal message (for logging only)
    internal_message: Option<String>,

    /// The source error that caused this error
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for SpacesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.user_message)?;
        if let Some(ref internal) = self.internal_message {
            write!(f, " (internal: {})", internal)?;
        }
        Ok(())
    }
}

impl SpacesError {
    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new error with code and user message.
    pub fn new(code: ErrorCode, user_message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            user_message: user_message.into(),
            internal_message: None,
            source: None,
        }
    }

    /// Create an error with both user and internal messages.
    pub fn with_internal(
        code: ErrorCode,
        user_message: impl Into<Cow<'static, str>>,
        internal_message: impl Into<String>,
    ) -> Self {
        let mut error = Self::new(code, user_message);
        error.internal_message = Some(internal_message.into());
        error
    }

    /// Create an upstream (collaborator) failure.
    pub fn upstream(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, message)
    }

    /// Create a not found error for a resource kind and name.
    pub fn not_found(code: ErrorCode, kind: &str, name: impl AsRef<str>) -> Self {
        Self::new(code, format!("{} \"{}\" not found", kind, name.as_ref()))
    }

    /// Create a not found error for a workspace.
    pub fn workspace_not_found(name: impl AsRef<str>) -> Self {
        Self::not_found(ErrorCode::WorkspaceNotFound, "workspaces", name)
    }

    /// Create an integrity error.
    pub fn integrity(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(code, message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Wrap this error as an upstream failure prefixed with `message`.
    ///
    /// The resulting user message is `"<message>: <original user message>"`.
    pub fn wrap(self, message: impl fmt::Display) -> Self {
        let user_message = format!("{}: {}", message, self.user_message);
        Self::new(ErrorCode::UpstreamUnavailable, user_message).with_source(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the user-facing message.
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::from_code(&self.code)
    }

    /// Whether this error is a not-found outcome.
    pub fn is_not_found(&self) -> bool {
        self.code.is_not_found()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────────────────────────────

    /// Log this error with appropriate severity.
    pub fn log(&self) {
        let code = self.code.to_string();
        let category = self.code.category();
        let status = self.http_status().as_u16();

        match self.severity() {
            ErrorSeverity::Critical => {
                error!(
                    error_code = %code,
                    category = category,
                    http_status = status,
                    user_message = %self.user_message,
                    internal_message = ?self.internal_message,
                    source = ?self.source,
                    "Integrity error"
                );
            }
            ErrorSeverity::High => {
                warn!(
                    error_code = %code,
                    category = category,
                    http_status = status,
                    user_message = %self.user_message,
                    internal_message = ?self.internal_message,
                    "Upstream error"
                );
            }
            ErrorSeverity::Low => {
                tracing::debug!(
                    error_code = %code,
                    category = category,
                    http_status = status,
                    user_message = %self.user_message,
                    "Request error"
                );
            }
        }
    }

    /// Count this error once, when it is returned to a client.
    fn record_metrics(&self) {
        counter!(
            ERRORS_TOTAL,
            "code" => self.code.to_string(),
            "category" => self.code.category().to_string(),
        )
        .increment(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// API Response
// ═══════════════════════════════════════════════════════════════════════════════

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false for errors
    pub success: bool,

    /// Error information
    pub error: ErrorInfo,
}

/// Detailed error information for API responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Numeric error code
    pub numeric_code: u32,

    /// User-facing error message
    pub message: String,

    /// Timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<&SpacesError> for ErrorResponse {
    fn from(error: &SpacesError) -> Self {
        Self {
            success: false,
            error: ErrorInfo {
                code: error.code,
                numeric_code: error.code.numeric_code(),
                message: error.user_message.to_string(),
                timestamp: chrono::Utc::now(),
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Axum Integration
// ═══════════════════════════════════════════════════════════════════════════════

impl IntoResponse for SpacesError {
    fn into_response(self) -> Response {
        self.log();
        self.record_metrics();

        let status = self.http_status();
        let response = ErrorResponse::from(&self);

        (status, Json(response)).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Context Extension Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Extension trait for turning foreign errors into [`SpacesError`]s.
pub trait ErrorContext<T> {
    /// Attach a code and a client-safe message; the foreign error becomes the
    /// internal detail and the source.
    fn context(self, code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|e| SpacesError::with_internal(code, message, e.to_string()).with_source(e))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
