//! Project a space and the caller's binding into a [`Workspace`].

use std::sync::Arc;

use crate::error::Result;
use crate::model::{Binding, Identity, Space, SpaceBinding, Workspace, WorkspaceType};
use crate::source::SpaceInformer;

#[derive(Clone)]
pub struct WorkspaceAssembler {
    informer: Arc<dyn SpaceInformer>,
}

impl WorkspaceAssembler {
    pub fn new(informer: Arc<dyn SpaceInformer>) -> Self {
        Self { informer }
    }

    /// The list-path projection: owner, role, type and namespaces.
    ///
    /// `caller` is the identity the request resolved to, even when access was
    /// granted through a public-viewer binding.
    pub fn summary(&self, space: &Space, caller: &Identity, binding: &SpaceBinding) -> Workspace {
        let mut workspace = Workspace::new(&space.name)
            .with_owner(&space.creator)
            .with_role(&binding.space_role)
            .with_namespaces(space.provisioned_namespaces.clone())
            .with_creation_timestamp(space.creation_timestamp);
        if !space.creator.is_empty() && space.creator == caller.name {
            workspace = workspace.with_type(WorkspaceType::Home);
        }
        workspace
    }

    /// The get-path projection: the summary plus the tier's roles and the
    /// classified binding rows.
    pub async fn detailed(
        &self,
        space: &Space,
        caller: &Identity,
        binding: &SpaceBinding,
        rows: Vec<Binding>,
    ) -> Result<Workspace> {
        let tier = self
            .informer
            .get_tier(&space.tier_name)
            .await
            .map_err(|e| e.wrap("unable to get nstemplatetier"))?;

        Ok(self
            .summary(space, caller, binding)
            .with_available_roles(tier.roles())
            .with_bindings(rows))
    }
}
