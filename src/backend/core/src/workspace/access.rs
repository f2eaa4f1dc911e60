//! Access decision for a single workspace.
//!
//! The caller may see a space only through exactly one applicable binding,
//! either its own or, when enabled, the public viewer's.

use tracing::warn;

use crate::config::PublicViewerConfig;
use crate::error::{ErrorCode, Result, SpacesError};
use crate::model::{Identity, Space, SpaceBinding};

/// Result of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access through `binding`, which belongs to `grantee`.
    Granted {
        grantee: Identity,
        binding: SpaceBinding,
    },
    Denied,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public_viewer: PublicViewerConfig,
}

impl AccessPolicy {
    pub fn new(public_viewer: PublicViewerConfig) -> Self {
        Self { public_viewer }
    }

    /// Decide whether `identity` may read `space`, given the ancestor-inclusive
    /// bindings of the space.
    pub fn decide(
        &self,
        identity: &Identity,
        space: &Space,
        bindings: &[SpaceBinding],
    ) -> Result<AccessDecision> {
        if let Some(binding) = single_binding(&identity.compliant_username, space, bindings)? {
            return Ok(AccessDecision::Granted {
                grantee: identity.clone(),
                binding,
            });
        }

        if self.public_viewer.enabled && !identity.is_public_viewer() {
            let viewer = Identity::public_viewer(&self.public_viewer.username);
            if let Some(binding) = single_binding(&viewer.compliant_username, space, bindings)? {
                return Ok(AccessDecision::Granted {
                    grantee: viewer,
                    binding,
                });
            }
        }

        warn!(
            user = %identity,
            workspace = %space.name,
            "unauthorized access - there is no SpaceBinding present for the user and the workspace"
        );
        Ok(AccessDecision::Denied)
    }
}

fn single_binding(
    master_user_record: &str,
    space: &Space,
    bindings: &[SpaceBinding],
) -> Result<Option<SpaceBinding>> {
    let mut matching = bindings
        .iter()
        .filter(|b| b.master_user_record == master_user_record);

    match (matching.next(), matching.next()) {
        (None, _) => Ok(None),
        (Some(binding), None) => Ok(Some(binding.clone())),
        (Some(_), Some(_)) => {
            let count = 2 + matching.count();
            Err(SpacesError::integrity(
                ErrorCode::DuplicateSpaceBinding,
                format!(
                    "expected only 1 spacebinding, got {} for user {} and workspace {}",
                    count, master_user_record, space.name
                ),
            ))
        }
    }
}
