//! Binding classification.
//!
//! Every binding that applies to a workspace becomes one row of the
//! workspace's binding list, annotated with the actions a workspace admin may
//! take on it. Requests still waiting to converge into a binding are appended
//! as their own rows.

use std::collections::HashSet;

use crate::error::{ErrorCode, Result, SpacesError};
use crate::model::{Binding, BindingAction, BindingRequestRef, Space, SpaceBinding, SpaceBindingRequest};

/// Where a binding that applies to a space came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingOrigin {
    /// Created by the system for this space (e.g. for the creator).
    System,
    /// Attached to an ancestor of the space.
    Inherited { space: String },
    /// Created from a SpaceBindingRequest on this space.
    Request(BindingRequestRef),
}

impl BindingOrigin {
    /// Determine the origin of `binding` relative to `space`.
    ///
    /// Fails when a binding on `space` references a request but lacks the
    /// request's name or namespace.
    pub fn of(binding: &SpaceBinding, space: &Space) -> Result<Self> {
        if binding.space != space.name {
            return Ok(Self::Inherited {
                space: binding.space.clone(),
            });
        }

        match binding.binding_request {
            None => Ok(Self::System),
            Some(ref request) if request.name.is_empty() => Err(SpacesError::integrity(
                ErrorCode::IncompleteBindingLabels,
                format!("SpaceBindingRequest name not found on binding: {}", binding.name),
            )),
            Some(ref request) if request.namespace.is_empty() => Err(SpacesError::integrity(
                ErrorCode::IncompleteBindingLabels,
                format!("SpaceBindingRequest namespace not found on binding: {}", binding.name),
            )),
            Some(ref request) => Ok(Self::Request(request.clone())),
        }
    }

    pub fn actions(&self) -> &'static [BindingAction] {
        match self {
            Self::System => &[],
            Self::Inherited { .. } => &[BindingAction::Override],
            Self::Request(_) => &[BindingAction::Update, BindingAction::Delete],
        }
    }
}

/// Build the binding rows of `space`.
///
/// `bindings` are the ancestor-inclusive bindings, `pending` the requests
/// found in the space's namespaces. A pending request is listed only when no
/// binding was created from it yet. Rows are sorted by MasterUserRecord; the
/// sort is stable so a binding precedes a request for the same user.
pub fn classify_bindings(
    space: &Space,
    bindings: &[SpaceBinding],
    pending: &[SpaceBindingRequest],
) -> Result<Vec<Binding>> {
    let mut rows = Vec::with_capacity(bindings.len() + pending.len());
    let mut converged: HashSet<BindingRequestRef> = HashSet::new();

    for binding in bindings {
        let origin = BindingOrigin::of(binding, space)?;
        let mut row = Binding::new(&binding.master_user_record, &binding.space_role)
            .with_actions(origin.actions());
        if let BindingOrigin::Request(request) = origin {
            converged.insert(request.clone());
            row = row.with_request(request);
        }
        rows.push(row);
    }

    for request in pending {
        let reference = request.reference();
        if !converged.insert(reference.clone()) {
            continue;
        }
        rows.push(
            Binding::new(&request.master_user_record, &request.space_role)
                .with_actions(&[BindingAction::Update, BindingAction::Delete])
                .with_request(reference),
        );
    }

    rows.sort_by(|a, b| a.master_user_record.cmp(&b.master_user_record));
    Ok(rows)
}
