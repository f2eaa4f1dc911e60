//! Resolve the caller of a request to the identity used for authorization.

use std::sync::Arc;

use tracing::debug;

use crate::config::PublicViewerConfig;
use crate::error::Result;
use crate::model::{Caller, Identity};
use crate::source::SignupService;

/// Outcome of identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A provisioned user.
    User(Identity),
    /// No usable signup; public viewer access stands in.
    PublicViewer(Identity),
    /// Signed up but not provisioned yet, and no public fallback.
    NotProvisioned,
    /// Never signed up, and no public fallback.
    Unknown,
}

impl Resolution {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::User(identity) | Self::PublicViewer(identity) => Some(identity),
            Self::NotProvisioned | Self::Unknown => None,
        }
    }

    pub fn into_identity(self) -> Option<Identity> {
        match self {
            Self::User(identity) | Self::PublicViewer(identity) => Some(identity),
            Self::NotProvisioned | Self::Unknown => None,
        }
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    signups: Arc<dyn SignupService>,
    public_viewer: PublicViewerConfig,
}

impl IdentityResolver {
    pub fn new(signups: Arc<dyn SignupService>, public_viewer: PublicViewerConfig) -> Self {
        Self {
            signups,
            public_viewer,
        }
    }

    pub async fn resolve(&self, caller: &Caller) -> Result<Resolution> {
        let signup = self
            .signups
            .get_signup(&caller.user_id, &caller.username)
            .await
            .map_err(|e| e.wrap("unable to get signup"))?;

        let fallback = match signup {
            Some(ref signup) if signup.is_provisioned() => {
                return Ok(Resolution::User(Identity::from(signup)));
            }
            Some(_) => Resolution::NotProvisioned,
            None => Resolution::Unknown,
        };

        if self.public_viewer.enabled {
            debug!(
                username = %caller.username,
                "No provisioned signup, using public viewer identity"
            );
            return Ok(Resolution::PublicViewer(Identity::public_viewer(
                &self.public_viewer.username,
            )));
        }

        debug!(username = %caller.username, outcome = ?fallback, "Caller has no usable identity");
        Ok(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Signup;
    use crate::source::InMemoryStore;

    fn store() -> Arc<InMemoryStore> {
        let store = InMemoryStore::new();
        store.insert_signup(Signup::new("dancelover", "dance.lover", "dancelover"));
        store.insert_signup(Signup::new("racinglover", "racing.lover", ""));
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_provisioned_user() {
        let resolver = IdentityResolver::new(store(), PublicViewerConfig::enabled());
        let resolution = resolver.resolve(&Caller::new("", "dance.lover")).await.unwrap();
        assert_eq!(
            resolution,
            Resolution::User(Identity::user("dancelover", "dancelover"))
        );
    }

    #[tokio::test]
    async fn test_not_provisioned_without_public_viewer() {
        let resolver = IdentityResolver::new(store(), PublicViewerConfig::disabled());
        let resolution = resolver.resolve(&Caller::new("", "racing.lover")).await.unwrap();
        assert_eq!(resolution, Resolution::NotProvisioned);
        assert!(resolution.identity().is_none());

        let resolution = resolver.resolve(&Caller::new("", "nobody")).await.unwrap();
        assert_eq!(resolution, Resolution::Unknown);
    }

    #[tokio::test]
    async fn test_public_viewer_fallback() {
        let resolver = IdentityResolver::new(store(), PublicViewerConfig::enabled());
        for username in ["racing.lover", "nobody"] {
            let resolution = resolver.resolve(&Caller::new("", username)).await.unwrap();
            let identity = resolution.identity().unwrap();
            assert!(identity.is_public_viewer());
            assert_eq!(identity.compliant_username, "kubesaw-authenticated");
        }
    }
}
