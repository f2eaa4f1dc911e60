//! Ancestor-inclusive SpaceBinding reads.
//!
//! A space inherits the bindings of every space above it. Walking from the
//! requested space towards the root, bindings found on a nearer space shadow
//! the bindings of the same MasterUserRecord further up.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use super::SpaceInformer;
use crate::error::Result;
use crate::model::{Space, SpaceBinding, SpaceBindingSelector};

/// Lists the bindings that apply to a space, including inherited ones.
#[derive(Clone)]
pub struct SpaceBindingLister {
    informer: Arc<dyn SpaceInformer>,
}

impl SpaceBindingLister {
    pub fn new(informer: Arc<dyn SpaceInformer>) -> Self {
        Self { informer }
    }

    /// Bindings attached to `space` and to all of its ancestors.
    ///
    /// When `master_user_record` is given only that user's bindings are
    /// returned. Shadowing is decided on the unfiltered set, so a filtered
    /// read never surfaces a parent binding the child already overrides.
    ///
    /// Several bindings for the same user on one space are all kept.
    pub async fn bindings_for_space_and_ancestors(
        &self,
        space: &Space,
        master_user_record: Option<&str>,
    ) -> Result<Vec<SpaceBinding>> {
        let mut merged: Vec<SpaceBinding> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = space.clone();

        loop {
            if !visited.insert(current.name.clone()) {
                warn!(
                    space = %space.name,
                    revisited = %current.name,
                    "Parent-space cycle detected, stopping ancestor walk"
                );
                break;
            }

            let level = self
                .informer
                .list_space_bindings(&SpaceBindingSelector::Space(current.name.clone()))
                .await?;

            let shadowed: HashSet<String> = merged
                .iter()
                .map(|b| b.master_user_record.clone())
                .collect();
            merged.extend(
                level
                    .into_iter()
                    .filter(|b| !shadowed.contains(&b.master_user_record)),
            );

            let Some(parent) = current.parent().map(str::to_string) else {
                break;
            };

            debug!(space = %current.name, parent = %parent, "Following parent-space");
            current = self
                .informer
                .get_space(&parent)
                .await
                .map_err(|e| e.wrap("unable to get parent-space"))?;
        }

        Ok(match master_user_record {
            Some(mur) => merged
                .into_iter()
                .filter(|b| b.master_user_record == mur)
                .collect(),
            None => merged,
        })
    }
}
