//! Read-side collaborators the workspace engine consumes.
//!
//! The engine never talks to an object store directly. It reads through the
//! async traits below, which production wiring backs with whatever index is
//! available and tests back with [`memory::InMemoryStore`].
//!
//! - [`SpaceInformer`]: cached view of Spaces, SpaceBindings and tiers on the host
//! - [`SignupService`]: signup lookup by user id / username
//! - [`MemberClusters`]: the member clusters hosting space namespaces
//! - [`SpaceBindingLister`]: ancestor-inclusive binding reads
//! - [`PendingRequestSource`]: SpaceBindingRequests not yet converged

pub mod ancestors;
pub mod fixtures;
pub mod memory;
pub mod pending;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{NsTemplateTier, Signup, Space, SpaceBinding, SpaceBindingRequest, SpaceBindingSelector};

pub use ancestors::SpaceBindingLister;
pub use fixtures::Fixtures;
pub use memory::{InMemoryMemberCluster, InMemoryStore, StaticMemberClusters};
pub use pending::{MemberClusterRequests, PendingRequestSource};

/// Host-cluster read model.
#[async_trait]
pub trait SpaceInformer: Send + Sync {
    /// Fetch a space by name. Fails with a not-found error when absent.
    async fn get_space(&self, name: &str) -> Result<Space>;

    /// List the bindings matching `selector`.
    async fn list_space_bindings(&self, selector: &SpaceBindingSelector) -> Result<Vec<SpaceBinding>>;

    /// Fetch a namespace template tier by name.
    async fn get_tier(&self, name: &str) -> Result<NsTemplateTier>;
}

/// Signup lookup.
#[async_trait]
pub trait SignupService: Send + Sync {
    /// `Ok(None)` when the user never signed up.
    async fn get_signup(&self, user_id: &str, username: &str) -> Result<Option<Signup>>;
}

/// A member cluster that can list the binding requests in a namespace.
#[async_trait]
pub trait MemberCluster: Send + Sync {
    fn name(&self) -> &str;

    async fn list_binding_requests(&self, namespace: &str) -> Result<Vec<SpaceBindingRequest>>;
}

/// Registry of member clusters.
pub trait MemberClusters: Send + Sync {
    fn members(&self) -> Vec<Arc<dyn MemberCluster>>;
}
