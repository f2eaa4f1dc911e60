//! JSON fixture files for the in-memory collaborators.
//!
//! ```json
//! {
//!   "signups": [{ "name": "alice", "username": "alice", "compliantUsername": "alice" }],
//!   "spaces": [{ "name": "alice", "creator": "alice", "targetCluster": "member-1" }],
//!   "spaceBindings": [{ "name": "alice-admin", "masterUserRecord": "alice", "space": "alice", "spaceRole": "admin" }],
//!   "tiers": [{ "name": "base", "spaceRoles": ["admin", "viewer"] }],
//!   "memberClusters": [{ "name": "member-1", "spaceBindingRequests": [] }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::memory::{InMemoryMemberCluster, InMemoryStore, StaticMemberClusters};
use crate::error::{ErrorCode, ErrorContext, Result, SpacesError};
use crate::model::{NsTemplateTier, Signup, Space, SpaceBinding, SpaceBindingRequest};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberClusterFixture {
    pub name: String,
    #[serde(default)]
    pub space_binding_requests: Vec<SpaceBindingRequest>,
}

/// Contents of a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    #[serde(default)]
    pub signups: Vec<Signup>,
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub space_bindings: Vec<SpaceBinding>,
    #[serde(default)]
    pub tiers: Vec<NsTemplateTier>,
    #[serde(default)]
    pub member_clusters: Vec<MemberClusterFixture>,
}

impl Fixtures {
    /// Read and validate a fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).context(
            ErrorCode::InvalidFixture,
            format!("unable to read fixture file {}", path.display()),
        )?;
        let fixtures = Self::from_json(&raw)?;

        info!(
            path = %path.display(),
            spaces = fixtures.spaces.len(),
            bindings = fixtures.space_bindings.len(),
            members = fixtures.member_clusters.len(),
            "Loaded fixtures"
        );
        Ok(fixtures)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let fixtures: Self = serde_json::from_str(raw)
            .context(ErrorCode::InvalidFixture, "unable to parse fixtures")?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    fn validate(&self) -> Result<()> {
        unique(self.spaces.iter().map(|s| s.name.as_str()), "space")?;
        unique(self.space_bindings.iter().map(|b| b.name.as_str()), "spacebinding")?;
        unique(self.tiers.iter().map(|t| t.name.as_str()), "nstemplatetier")?;
        unique(self.signups.iter().map(|s| s.username.as_str()), "signup")?;
        unique(self.member_clusters.iter().map(|m| m.name.as_str()), "member cluster")?;
        Ok(())
    }

    /// Build the in-memory collaborators.
    pub fn into_sources(self) -> (Arc<InMemoryStore>, Arc<StaticMemberClusters>) {
        let store = InMemoryStore::new();
        self.spaces.into_iter().for_each(|s| store.insert_space(s));
        self.space_bindings.into_iter().for_each(|b| store.insert_binding(b));
        self.tiers.into_iter().for_each(|t| store.insert_tier(t));
        self.signups.into_iter().for_each(|s| store.insert_signup(s));

        let clusters = StaticMemberClusters::new();
        for member in self.member_clusters {
            clusters.add(Arc::new(
                InMemoryMemberCluster::new(member.name).with_requests(member.space_binding_requests),
            ));
        }
        (Arc::new(store), Arc::new(clusters))
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a str>, kind: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(SpacesError::new(
                ErrorCode::InvalidFixture,
                format!("{} with an empty name", kind),
            ));
        }
        if !seen.insert(name) {
            return Err(SpacesError::new(
                ErrorCode::InvalidFixture,
                format!("duplicate {} \"{}\"", kind, name),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemberClusters, SpaceInformer};
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "signups": [{ "name": "dancelover", "username": "dance.lover", "compliantUsername": "dancelover" }],
        "spaces": [
            { "name": "dancelover", "creator": "dancelover", "targetCluster": "member-1", "tierName": "base",
              "provisionedNamespaces": [{ "name": "dancelover-dev", "type": "default" }] }
        ],
        "spaceBindings": [
            { "name": "dancelover-admin", "masterUserRecord": "dancelover", "space": "dancelover", "spaceRole": "admin" }
        ],
        "tiers": [{ "name": "base", "spaceRoles": ["admin", "viewer"] }],
        "memberClusters": [
            { "name": "member-1", "spaceBindingRequests": [
                { "name": "r1", "namespace": "dancelover-dev", "masterUserRecord": "bob", "spaceRole": "viewer" }
            ] }
        ]
    }"#;

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let fixtures = Fixtures::from_file(file.path()).unwrap();
        let (store, clusters) = fixtures.into_sources();

        assert_eq!(store.space_count(), 1);
        assert_eq!(store.binding_count(), 1);
        let tier = store.get_tier("base").await.unwrap();
        assert_eq!(tier.roles(), vec!["admin", "viewer"]);
        let members = clusters.members();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].list_binding_requests("dancelover-dev").await.unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_space_rejected() {
        let err = Fixtures::from_json(r#"{ "spaces": [{ "name": "a" }, { "name": "a" }] }"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFixture);
        assert_eq!(err.user_message(), "duplicate space \"a\"");
    }

    #[test]
    fn test_missing_file() {
        let err = Fixtures::from_file("/nonexistent/fixtures.json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFixture);
    }

    #[test]
    fn test_malformed_document() {
        let err = Fixtures::from_json(r#"{ "spaces": [ "#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFixture);
        assert_eq!(err.user_message(), "unable to parse fixtures");
    }

    #[test]
    fn test_empty_document() {
        let fixtures = Fixtures::from_json("{}").unwrap();
        assert!(fixtures.spaces.is_empty());
    }
}
