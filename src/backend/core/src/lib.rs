#![allow(clippy::result_large_err)]
//! # Spaces Core
//!
//! Workspace access and binding reconciliation for a multi-tenant space
//! hierarchy.
//!
//! ## Architecture
//!
//! - **Model**: Spaces, SpaceBindings, SpaceBindingRequests, tiers and the Workspace view
//! - **Source**: Async read traits over the host store and member clusters, with in-memory implementations
//! - **Workspace**: Identity resolution, ancestor-aware access decisions, binding classification and assembly
//! - **API**: Axum router with bearer-token authentication
//! - **Telemetry**: Structured logging and Prometheus metrics

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod source;
pub mod telemetry;
pub mod workspace;

pub use error::{ErrorCode, ErrorContext, ErrorSeverity, Result, SpacesError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, PublicViewerConfig};
    pub use crate::error::{ErrorCode, ErrorContext, Result, SpacesError};
    pub use crate::model::{
        Binding, BindingAction, BindingRequestRef, Caller, Identity, NsTemplateTier, Signup, Space,
        SpaceBinding, SpaceBindingRequest, SpaceBindingSelector, Workspace, WorkspaceList,
        PUBLIC_VIEWER_USERNAME,
    };
    pub use crate::source::{
        InMemoryMemberCluster, InMemoryStore, MemberCluster, MemberClusters, PendingRequestSource,
        SignupService, SpaceInformer, StaticMemberClusters,
    };
    pub use crate::workspace::{BindingOrigin, SpaceLister};
}
