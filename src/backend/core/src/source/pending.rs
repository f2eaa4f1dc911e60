//! Pending SpaceBindingRequests.
//!
//! A request lives in one of the space's provisioned namespaces on a member
//! cluster until the host turns it into a SpaceBinding. The collector queries
//! every member cluster for every provisioned namespace concurrently and fails
//! as soon as one query fails.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

use tracing::debug;

use super::MemberClusters;
use crate::error::{ErrorCode, Result, SpacesError};
use crate::model::{Space, SpaceBindingRequest};

/// Source of SpaceBindingRequests for a space.
#[async_trait]
pub trait PendingRequestSource: Send + Sync {
    async fn pending_requests_for_space(&self, space: &Space) -> Result<Vec<SpaceBindingRequest>>;
}

/// Reads requests from every registered member cluster.
#[derive(Clone)]
pub struct MemberClusterRequests {
    clusters: Arc<dyn MemberClusters>,
}

impl MemberClusterRequests {
    pub fn new(clusters: Arc<dyn MemberClusters>) -> Self {
        Self { clusters }
    }
}

#[async_trait]
impl PendingRequestSource for MemberClusterRequests {
    async fn pending_requests_for_space(&self, space: &Space) -> Result<Vec<SpaceBindingRequest>> {
        let members = self.clusters.members();
        if members.is_empty() {
            return Err(SpacesError::new(
                ErrorCode::NoMemberClusters,
                "no member clusters found",
            ));
        }

        if space.provisioned_namespaces.is_empty() {
            return Ok(Vec::new());
        }

        let queries = members.iter().flat_map(|member| {
            space.provisioned_namespaces.iter().map(move |ns| {
                let member = Arc::clone(member);
                async move { member.list_binding_requests(&ns.name).await }
            })
        });
        let requests: Vec<SpaceBindingRequest> = try_join_all(queries)
            .await?
            .into_iter()
            .flatten()
            .collect();

        debug!(
            space = %space.name,
            members = members.len(),
            count = requests.len(),
            "Collected SpaceBindingRequests"
        );
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::{InMemoryMemberCluster, StaticMemberClusters};
    use crate::source::MemberCluster;

    fn space() -> Space {
        Space::new("movielover")
            .with_target_cluster("member-1")
            .with_namespace("movielover-dev", "default")
            .with_namespace("movielover-stage", "")
    }

    #[tokio::test]
    async fn test_no_member_clusters() {
        let source = MemberClusterRequests::new(Arc::new(StaticMemberClusters::new()));
        let err = source.pending_requests_for_space(&space()).await.unwrap_err();
        assert_eq!(err.user_message(), "no member clusters found");
        assert_eq!(err.code(), ErrorCode::NoMemberClusters);
    }

    #[tokio::test]
    async fn test_collects_across_members_and_namespaces() {
        let first = InMemoryMemberCluster::new("member-1").with_requests(vec![
            SpaceBindingRequest::new("r-dev", "movielover-dev", "bob", "viewer"),
            SpaceBindingRequest::new("r-stage", "movielover-stage", "carol", "admin"),
            SpaceBindingRequest::new("r-other", "other-dev", "dave", "admin"),
        ]);
        let second = InMemoryMemberCluster::new("member-2").with_requests(vec![
            SpaceBindingRequest::new("r-elsewhere", "movielover-dev", "erin", "admin"),
        ]);
        let clusters = StaticMemberClusters::new()
            .with_member(Arc::new(second))
            .with_member(Arc::new(first));
        let source = MemberClusterRequests::new(Arc::new(clusters));

        let mut names: Vec<_> = source
            .pending_requests_for_space(&space())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["r-dev", "r-elsewhere", "r-stage"]);
    }

    #[tokio::test]
    async fn test_target_cluster_not_registered() {
        let clusters = StaticMemberClusters::new().with_member(Arc::new(
            InMemoryMemberCluster::new("member-2").with_requests(vec![SpaceBindingRequest::new(
                "bob-sbr",
                "movielover-dev",
                "bob",
                "viewer",
            )]),
        ));
        let source = MemberClusterRequests::new(Arc::new(clusters));
        let requests = source.pending_requests_for_space(&space()).await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "bob-sbr");
    }

    /// Member whose reads fail for one namespace.
    struct FlakyMember {
        failing_namespace: &'static str,
    }

    #[async_trait]
    impl MemberCluster for FlakyMember {
        fn name(&self) -> &str {
            "member-flaky"
        }

        async fn list_binding_requests(&self, namespace: &str) -> Result<Vec<SpaceBindingRequest>> {
            if namespace == self.failing_namespace {
                Err(SpacesError::upstream("mock member error"))
            } else {
                Ok(vec![SpaceBindingRequest::new("r-ok", namespace, "bob", "viewer")])
            }
        }
    }

    #[tokio::test]
    async fn test_one_failing_namespace_fails_the_whole_read() {
        let clusters = StaticMemberClusters::new()
            .with_member(Arc::new(InMemoryMemberCluster::new("member-1")))
            .with_member(Arc::new(FlakyMember { failing_namespace: "movielover-stage" }));
        let source = MemberClusterRequests::new(Arc::new(clusters));
        let err = source.pending_requests_for_space(&space()).await.unwrap_err();
        assert_eq!(err.user_message(), "mock member error");
    }

    #[tokio::test]
    async fn test_space_without_namespaces() {
        let clusters = StaticMemberClusters::new()
            .with_member(Arc::new(InMemoryMemberCluster::new("member-1")));
        let source = MemberClusterRequests::new(Arc::new(clusters));
        let requests = source
            .pending_requests_for_space(&Space::new("empty"))
            .await
            .unwrap();
        assert!(requests.is_empty());
    }
}
