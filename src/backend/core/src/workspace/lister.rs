//! Workspace reads for an authenticated caller.
//!
//! `get_user_workspace` fails on the first error it meets, while
//! `list_user_workspaces` skips spaces it cannot resolve and fails only when
//! the binding index itself cannot be read.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::access::{AccessDecision, AccessPolicy};
use super::assembler::WorkspaceAssembler;
use super::classifier::classify_bindings;
use super::identity::IdentityResolver;
use crate::config::PublicViewerConfig;
use crate::error::Result;
use crate::model::{Caller, Identity, Space, SpaceBinding, SpaceBindingSelector, Workspace};
use crate::source::{
    MemberClusterRequests, MemberClusters, PendingRequestSource, SignupService, SpaceBindingLister,
    SpaceInformer,
};

/// Answers workspace queries on behalf of callers.
#[derive(Clone)]
pub struct SpaceLister {
    resolver: IdentityResolver,
    informer: Arc<dyn SpaceInformer>,
    ancestors: SpaceBindingLister,
    pending: Arc<dyn PendingRequestSource>,
    access: AccessPolicy,
    assembler: WorkspaceAssembler,
    public_viewer: PublicViewerConfig,
}

impl SpaceLister {
    pub fn new(
        signups: Arc<dyn SignupService>,
        informer: Arc<dyn SpaceInformer>,
        members: Arc<dyn MemberClusters>,
        public_viewer: PublicViewerConfig,
    ) -> Self {
        Self::with_pending_source(
            signups,
            informer,
            Arc::new(MemberClusterRequests::new(members)),
            public_viewer,
        )
    }

    /// Use a custom source for pending SpaceBindingRequests.
    pub fn with_pending_source(
        signups: Arc<dyn SignupService>,
        informer: Arc<dyn SpaceInformer>,
        pending: Arc<dyn PendingRequestSource>,
        public_viewer: PublicViewerConfig,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(signups, public_viewer.clone()),
            ancestors: SpaceBindingLister::new(Arc::clone(&informer)),
            assembler: WorkspaceAssembler::new(Arc::clone(&informer)),
            access: AccessPolicy::new(public_viewer.clone()),
            informer,
            pending,
            public_viewer,
        }
    }

    /// The named workspace, or `None` when the caller may not see it.
    #[instrument(skip(self, caller), fields(username = %caller.username))]
    pub async fn get_user_workspace(&self, caller: &Caller, name: &str) -> Result<Option<Workspace>> {
        let Some(identity) = self.resolver.resolve(caller).await?.into_identity() else {
            return Ok(None);
        };

        let space = match self.informer.get_space(name).await {
            Ok(space) => space,
            Err(e) if e.is_not_found() => {
                debug!(workspace = %name, "Space not found");
                return Ok(None);
            }
            Err(e) => return Err(e.wrap("unable to get space")),
        };

        let bindings = self
            .ancestors
            .bindings_for_space_and_ancestors(&space, None)
            .await?;

        let binding = match self.access.decide(&identity, &space, &bindings)? {
            AccessDecision::Granted { binding, .. } => binding,
            AccessDecision::Denied => return Ok(None),
        };

        let pending = self.pending.pending_requests_for_space(&space).await?;
        let rows = classify_bindings(&space, &bindings, &pending)?;

        let workspace = self
            .assembler
            .detailed(&space, &identity, &binding, rows)
            .await?;
        info!(
            workspace = %workspace.name(),
            role = %workspace.status.role,
            bindings = workspace.status.bindings.len(),
            "Workspace resolved"
        );
        Ok(Some(workspace))
    }

    /// All workspaces the caller has a binding for, ordered by name.
    #[instrument(skip(self, caller), fields(username = %caller.username))]
    pub async fn list_user_workspaces(&self, caller: &Caller) -> Result<Vec<Workspace>> {
        let Some(identity) = self.resolver.resolve(caller).await?.into_identity() else {
            return Ok(Vec::new());
        };

        let murs = self.master_user_records(&identity);
        let bindings = self
            .informer
            .list_space_bindings(&SpaceBindingSelector::MasterUserRecords(murs))
            .await?;

        let mut by_space: BTreeMap<String, (Space, SpaceBinding)> = BTreeMap::new();
        for binding in bindings {
            if binding.space.is_empty() {
                error!(binding = %binding.name, "spacebinding has no space label");
                continue;
            }

            let own = binding.master_user_record == identity.compliant_username;
            if let Some((_, existing)) = by_space.get(&binding.space) {
                if !own || existing.master_user_record == identity.compliant_username {
                    continue;
                }
            }

            let space = match self.informer.get_space(&binding.space).await {
                Ok(space) => space,
                Err(e) => {
                    error!(
                        binding = %binding.name,
                        space = %binding.space,
                        error = %e,
                        "unable to get space, skipping"
                    );
                    continue;
                }
            };
            by_space.insert(space.name.clone(), (space, binding));
        }

        let workspaces: Vec<Workspace> = by_space
            .values()
            .map(|(space, binding)| self.assembler.summary(space, &identity, binding))
            .collect();
        debug!(count = workspaces.len(), "Workspaces listed");
        Ok(workspaces)
    }

    fn master_user_records(&self, identity: &Identity) -> Vec<String> {
        let mut murs = vec![identity.compliant_username.clone()];
        if self.public_viewer.enabled && !identity.is_public_viewer() {
            murs.push(self.public_viewer.username.clone());
        }
        murs
    }
}
