//! Caller identities: the raw request attributes, the signup record and the
//! resolved identity the engine authorizes with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known MasterUserRecord name used for public (community) access.
pub const PUBLIC_VIEWER_USERNAME: &str = "kubesaw-authenticated";

/// Identity attributes taken from the authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caller {
    /// Subject claim.
    pub user_id: String,
    /// Preferred username claim.
    pub username: String,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }
}

/// A user's signup record as returned by the signup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    /// Signup object name; spaces record it as their creator.
    pub name: String,
    /// Username the user authenticates with.
    pub username: String,
    /// Compliant (MasterUserRecord) name. Empty until provisioning completes.
    #[serde(default)]
    pub compliant_username: String,
    /// Optional user id (subject claim).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Signup {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        compliant_username: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            compliant_username: compliant_username.into(),
            user_id: None,
        }
    }

    /// Whether the account finished provisioning.
    pub fn is_provisioned(&self) -> bool {
        !self.compliant_username.is_empty()
    }
}

/// How an [`Identity`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    /// The caller's own provisioned account.
    User,
    /// The configured public-viewer fallback.
    PublicViewer,
}

/// Resolved identity used for access decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Compliant username; matched against `SpaceBinding::master_user_record`.
    pub compliant_username: String,
    /// Displayable signup name; compared with a space's creator.
    pub name: String,
    pub kind: IdentityKind,
}

impl Identity {
    /// Identity of a provisioned user.
    pub fn user(compliant_username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            compliant_username: compliant_username.into(),
            name: name.into(),
            kind: IdentityKind::User,
        }
    }

    /// Public-viewer identity for the given username.
    pub fn public_viewer(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            compliant_username: username.clone(),
            name: username,
            kind: IdentityKind::PublicViewer,
        }
    }

    pub fn is_public_viewer(&self) -> bool {
        self.kind == IdentityKind::PublicViewer
    }
}

impl From<&Signup> for Identity {
    fn from(signup: &Signup) -> Self {
        Self::user(&signup.compliant_username, &signup.name)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compliant_username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_provisioned() {
        assert!(Signup::new("dancelover", "dance.lover", "dancelover").is_provisioned());
        assert!(!Signup::new("racinglover", "racing.lover", "").is_provisioned());
    }

    #[test]
    fn test_identity_from_signup() {
        let signup = Signup::new("dance-lover", "dance.lover", "dancelover");
        let identity = Identity::from(&signup);
        assert_eq!(identity.compliant_username, "dancelover");
        assert_eq!(identity.name, "dance-lover");
        assert!(!identity.is_public_viewer());
    }

    #[test]
    fn test_public_viewer_identity() {
        let identity = Identity::public_viewer(PUBLIC_VIEWER_USERNAME);
        assert!(identity.is_public_viewer());
        assert_eq!(identity.to_string(), PUBLIC_VIEWER_USERNAME);
        assert_eq!(identity.name, PUBLIC_VIEWER_USERNAME);
    }
}
