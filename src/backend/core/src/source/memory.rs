//! In-memory collaborators backed by concurrent maps.
//!
//! Used by the server when it runs from a fixture file and by the tests.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use super::{MemberCluster, MemberClusters, SignupService, SpaceInformer};
use crate::error::{ErrorCode, Result, SpacesError};
use crate::model::{NsTemplateTier, Signup, Space, SpaceBinding, SpaceBindingRequest, SpaceBindingSelector};

// ═══════════════════════════════════════════════════════════════════════════════
// Host Store
// ═══════════════════════════════════════════════════════════════════════════════

/// Spaces, bindings, tiers and signups held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    spaces: DashMap<String, Space>,
    bindings: DashMap<String, SpaceBinding>,
    tiers: DashMap<String, NsTemplateTier>,
    /// Keyed by username.
    signups: DashMap<String, Signup>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_space(&self, space: Space) {
        self.spaces.insert(space.name.clone(), space);
    }

    pub fn remove_space(&self, name: &str) -> Option<Space> {
        self.spaces.remove(name).map(|(_, space)| space)
    }

    pub fn insert_binding(&self, binding: SpaceBinding) {
        self.bindings.insert(binding.name.clone(), binding);
    }

    pub fn insert_tier(&self, tier: NsTemplateTier) {
        self.tiers.insert(tier.name.clone(), tier);
    }

    pub fn insert_signup(&self, signup: Signup) {
        self.signups.insert(signup.username.clone(), signup);
    }

    /// Synchronous space lookup.
    pub fn space(&self, name: &str) -> Option<Space> {
        self.spaces.get(name).map(|s| s.value().clone())
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

#[async_trait]
impl SpaceInformer for InMemoryStore {
    async fn get_space(&self, name: &str) -> Result<Space> {
        self.space(name)
            .ok_or_else(|| SpacesError::not_found(ErrorCode::SpaceNotFound, "spaces", name))
    }

    async fn list_space_bindings(&self, selector: &SpaceBindingSelector) -> Result<Vec<SpaceBinding>> {
        let mut bindings: Vec<SpaceBinding> = self
            .bindings
            .iter()
            .filter(|entry| selector.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        bindings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(bindings)
    }

    async fn get_tier(&self, name: &str) -> Result<NsTemplateTier> {
        self.tiers
            .get(name)
            .map(|t| t.value().clone())
            .ok_or_else(|| SpacesError::not_found(ErrorCode::TierNotFound, "nstemplatetiers", name))
    }
}

#[async_trait]
impl SignupService for InMemoryStore {
    async fn get_signup(&self, user_id: &str, username: &str) -> Result<Option<Signup>> {
        if !user_id.is_empty() {
            let by_id = self
                .signups
                .iter()
                .find(|entry| entry.value().user_id.as_deref() == Some(user_id))
                .map(|entry| entry.value().clone());
            if by_id.is_some() {
                return Ok(by_id);
            }
        }
        Ok(self.signups.get(username).map(|s| s.value().clone()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Member Clusters
// ═══════════════════════════════════════════════════════════════════════════════

/// A member cluster holding SpaceBindingRequests in memory.
#[derive(Debug)]
pub struct InMemoryMemberCluster {
    name: String,
    requests: RwLock<Vec<SpaceBindingRequest>>,
}

impl InMemoryMemberCluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: RwLock::new(Vec::new()),
        }
    }

    pub fn with_requests(self, requests: Vec<SpaceBindingRequest>) -> Self {
        *self.requests.write() = requests;
        self
    }

    pub fn insert_request(&self, request: SpaceBindingRequest) {
        self.requests.write().push(request);
    }
}

#[async_trait]
impl MemberCluster for InMemoryMemberCluster {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_binding_requests(&self, namespace: &str) -> Result<Vec<SpaceBindingRequest>> {
        Ok(self
            .requests
            .read()
            .iter()
            .filter(|r| r.namespace == namespace)
            .cloned()
            .collect())
    }
}

/// A fixed set of member clusters.
#[derive(Default)]
pub struct StaticMemberClusters {
    members: RwLock<Vec<Arc<dyn MemberCluster>>>,
}

impl StaticMemberClusters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(self, member: Arc<dyn MemberCluster>) -> Self {
        self.add(member);
        self
    }

    pub fn add(&self, member: Arc<dyn MemberCluster>) {
        self.members.write().push(member);
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }
}

impl MemberClusters for StaticMemberClusters {
    fn members(&self) -> Vec<Arc<dyn MemberCluster>> {
        self.members.read().clone()
    }
}
