//! Space tree objects: spaces, committed bindings, pending binding requests
//! and the tier role catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ═══════════════════════════════════════════════════════════════════════════════
// Space
// ═══════════════════════════════════════════════════════════════════════════════

/// A namespace provisioned for a space on its target cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceNamespace {
    /// Namespace name.
    pub name: String,
    /// Namespace type (e.g. `default`).
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub namespace_type: String,
}

impl SpaceNamespace {
    pub fn new(name: impl Into<String>, namespace_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace_type: namespace_type.into(),
        }
    }
}

/// A node in the tenant hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Space name, unique within the host namespace.
    pub name: String,
    /// Host namespace holding the space object.
    #[serde(default)]
    pub namespace: String,
    /// Name of the parent space, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_space: Option<String>,
    /// Member cluster the space is provisioned on.
    #[serde(default)]
    pub target_cluster: String,
    /// Tier whose role catalog applies to this space.
    #[serde(default)]
    pub tier_name: String,
    /// Signup name of the user who created the space.
    #[serde(default)]
    pub creator: String,
    /// Namespaces provisioned for this space.
    #[serde(default)]
    pub provisioned_namespaces: Vec<SpaceNamespace>,
    /// When the space object was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl Space {
    /// Create a space with no parent, no namespaces and an empty creator.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            parent_space: None,
            target_cluster: String::new(),
            tier_name: String::new(),
            creator: String::new(),
            provisioned_namespaces: Vec::new(),
            creation_timestamp: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_space = Some(parent.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    pub fn with_target_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.target_cluster = cluster.into();
        self
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier_name = tier.into();
        self
    }

    pub fn with_namespace(mut self, name: impl Into<String>, namespace_type: impl Into<String>) -> Self {
        self.provisioned_namespaces
            .push(SpaceNamespace::new(name, namespace_type));
        self
    }

    /// The parent space name, treating an empty reference as no parent.
    pub fn parent(&self) -> Option<&str> {
        self.parent_space.as_deref().filter(|p| !p.is_empty())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Reference to the SpaceBindingRequest a binding originated from.
///
/// On a [`SpaceBinding`] either field may be empty when the object was only
/// partially labelled; the classifier rejects such bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingRequestRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl BindingRequestRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// A committed grant of a space role to a MasterUserRecord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceBinding {
    /// Object name.
    pub name: String,
    /// Compliant username of the grantee.
    pub master_user_record: String,
    /// Name of the space this binding is attached to (empty if unknown).
    #[serde(default)]
    pub space: String,
    /// Granted role.
    pub space_role: String,
    /// Originating request, when the binding was created from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_request: Option<BindingRequestRef>,
}

impl SpaceBinding {
    pub fn new(
        name: impl Into<String>,
        master_user_record: impl Into<String>,
        space: impl Into<String>,
        space_role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            master_user_record: master_user_record.into(),
            space: space.into(),
            space_role: space_role.into(),
            binding_request: None,
        }
    }

    /// Record the request this binding was created from.
    pub fn from_request(mut self, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.binding_request = Some(BindingRequestRef::new(name, namespace));
        self
    }
}

/// A binding change requested from inside one of the space's namespaces that
/// may not have produced a [`SpaceBinding`] yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceBindingRequest {
    pub name: String,
    pub namespace: String,
    pub master_user_record: String,
    pub space_role: String,
}

impl SpaceBindingRequest {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        master_user_record: impl Into<String>,
        space_role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            master_user_record: master_user_record.into(),
            space_role: space_role.into(),
        }
    }

    pub fn reference(&self) -> BindingRequestRef {
        BindingRequestRef::new(&self.name, &self.namespace)
    }
}

/// Selects SpaceBindings from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceBindingSelector {
    /// Bindings attached to the named space.
    Space(String),
    /// Bindings granted to any of the given MasterUserRecords.
    MasterUserRecords(Vec<String>),
}

impl SpaceBindingSelector {
    pub fn matches(&self, binding: &SpaceBinding) -> bool {
        match self {
            Self::Space(space) => binding.space == *space,
            Self::MasterUserRecords(murs) => murs.iter().any(|m| *m == binding.master_user_record),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tier
// ═══════════════════════════════════════════════════════════════════════════════

/// Namespace template tier; only its role catalog is used here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NsTemplateTier {
    pub name: String,
    #[serde(default)]
    pub space_roles: BTreeSet<String>,
}

impl NsTemplateTier {
    pub fn new<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            space_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Role names in ascending order.
    pub fn roles(&self) -> Vec<String> {
        self.space_roles.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parent_is_no_parent() {
        let space = Space::new("child").with_parent("");
        assert_eq!(space.parent(), None);

        let space = Space::new("child").with_parent("parent");
        assert_eq!(space.parent(), Some("parent"));
    }

    #[test]
    fn test_selector_matches() {
        let sb = SpaceBinding::new("sb", "alice", "alicespace", "admin");
        assert!(SpaceBindingSelector::Space("alicespace".into()).matches(&sb));
        assert!(!SpaceBindingSelector::Space("other".into()).matches(&sb));
        assert!(SpaceBindingSelector::MasterUserRecords(vec!["bob".into(), "alice".into()])
            .matches(&sb));
        assert!(!SpaceBindingSelector::MasterUserRecords(vec![]).matches(&sb));
    }

    #[test]
    fn test_tier_roles_sorted() {
        let tier = NsTemplateTier::new("base", ["viewer", "admin", "contributor"]);
        assert_eq!(tier.roles(), vec!["admin", "contributor", "viewer"]);
    }

    #[test]
    fn test_space_binding_deserializes_partial_request() {
        let sb: SpaceBinding = serde_json::from_value(serde_json::json!({
            "name": "sb",
            "masterUserRecord": "alice",
            "space": "alicespace",
            "spaceRole": "admin",
            "bindingRequest": { "name": "alice-sbr" }
        }))
        .unwrap();
        assert_eq!(
            sb.binding_request,
            Some(BindingRequestRef::new("alice-sbr", ""))
        );
    }
}
