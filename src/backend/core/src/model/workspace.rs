//! The Workspace view returned to API clients.
//!
//! Workspaces are derived projections of a [`Space`](super::Space); they are
//! built fresh for every request and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::space::{BindingRequestRef, SpaceNamespace};

/// API version stamped on workspace objects.
pub const API_VERSION: &str = "toolchain.dev.openshift.com/v1alpha1";

// ═══════════════════════════════════════════════════════════════════════════════
// Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Operations a workspace user may perform on a binding row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingAction {
    /// Change the role by editing the originating request.
    Update,
    /// Revoke access by deleting the originating request.
    Delete,
    /// Supersede an inherited grant with a request on this space.
    Override,
}

impl BindingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Override => "override",
        }
    }
}

impl fmt::Display for BindingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a workspace's binding list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub master_user_record: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_actions: Vec<BindingAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_request: Option<BindingRequestRef>,
}

impl Binding {
    pub fn new(master_user_record: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            master_user_record: master_user_record.into(),
            role: role.into(),
            available_actions: Vec::new(),
            binding_request: None,
        }
    }

    pub fn with_actions(mut self, actions: &[BindingAction]) -> Self {
        self.available_actions = actions.to_vec();
        self
    }

    pub fn with_request(mut self, request: BindingRequestRef) -> Self {
        self.binding_request = Some(request);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Workspace
// ═══════════════════════════════════════════════════════════════════════════════

/// Workspace type marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceType {
    /// The caller's own home space.
    Home,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatus {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub workspace_type: Option<WorkspaceType>,
    #[serde(default)]
    pub namespaces: Vec<SpaceNamespace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,
}

/// A user-facing view of a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub kind: String,
    pub api_version: String,
    pub metadata: ObjectMeta,
    pub status: WorkspaceStatus,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: "Workspace".to_string(),
            api_version: API_VERSION.to_string(),
            metadata: ObjectMeta {
                name: name.into(),
                creation_timestamp: None,
            },
            status: WorkspaceStatus::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.status.owner = owner.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.status.role = role.into();
        self
    }

    pub fn with_type(mut self, workspace_type: WorkspaceType) -> Self {
        self.status.workspace_type = Some(workspace_type);
        self
    }

    pub fn with_namespaces(mut self, namespaces: Vec<SpaceNamespace>) -> Self {
        self.status.namespaces = namespaces;
        self
    }

    pub fn with_available_roles(mut self, roles: Vec<String>) -> Self {
        self.status.available_roles = roles;
        self
    }

    pub fn with_bindings(mut self, bindings: Vec<Binding>) -> Self {
        self.status.bindings = bindings;
        self
    }

    pub fn with_creation_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.metadata.creation_timestamp = timestamp;
        self
    }

    pub fn is_home(&self) -> bool {
        self.status.workspace_type == Some(WorkspaceType::Home)
    }
}

/// List envelope for the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceList {
    pub kind: String,
    pub api_version: String,
    pub items: Vec<Workspace>,
}

impl WorkspaceList {
    pub fn new(items: Vec<Workspace>) -> Self {
        Self {
            kind: "WorkspaceList".to_string(),
            api_version: API_VERSION.to_string(),
            items,
        }
    }
}
