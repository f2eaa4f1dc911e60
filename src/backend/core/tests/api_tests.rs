//! HTTP API tests.
//!
//! Tests cover:
//! - Health and metrics endpoints
//! - Bearer token rejection
//! - Workspace list and get responses
//! - Error status mapping and response bodies
//! - Request id propagation

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use spaces_core::api::{build_router, AppState, Claims, JwtVerifier};
use spaces_core::config::{AuthConfig, PublicViewerConfig};
use spaces_core::error::ErrorResponse;
use spaces_core::model::{Signup, Space, SpaceBinding, WorkspaceList};
use spaces_core::source::{InMemoryMemberCluster, InMemoryStore, StaticMemberClusters};
use spaces_core::telemetry::MetricsRegistry;
use spaces_core::workspace::SpaceLister;

// ============================================================================
// Test Utilities
// ============================================================================

const SECRET: &str = "api-test-secret";

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SECRET.to_string(),
        issuer: None,
    }
}

fn app() -> Router {
    let store = InMemoryStore::new();
    store.insert_signup(Signup::new("dancelover", "dance.lover", "dancelover"));
    store.insert_tier(spaces_core::model::NsTemplateTier::new("base", ["admin", "viewer"]));
    store.insert_space(
        Space::new("dancelover")
            .with_creator("dancelover")
            .with_tier("base")
            .with_target_cluster("member-1")
            .with_namespace("dancelover-dev", "default"),
    );
    store.insert_space(Space::new("broken").with_creator("x").with_tier("base"));
    store.insert_binding(SpaceBinding::new("sb-1", "dancelover", "dancelover", "admin"));
    store.insert_binding(SpaceBinding::new("sb-2", "dancelover", "broken", "admin"));
    store.insert_binding(SpaceBinding::new("sb-3", "dancelover", "broken", "viewer"));
    let store = Arc::new(store);

    let members = StaticMemberClusters::new()
        .with_member(Arc::new(InMemoryMemberCluster::new("member-1")));
    let lister = SpaceLister::new(
        store.clone(),
        store,
        Arc::new(members),
        PublicViewerConfig::disabled(),
    );

    build_router(AppState::new(
        lister,
        JwtVerifier::new(&auth_config()),
        MetricsRegistry::disabled(),
    ))
}

fn token(username: &str) -> String {
    JwtVerifier::new(&auth_config())
        .sign(&Claims::new("u-1", username, 300))
        .unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Unauthenticated Endpoints
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let response = app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let response = app().oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_401() {
    let response = app().oneshot(get("/api/v1/workspaces", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIALS");
}

#[tokio::test]
async fn test_forged_token_is_401() {
    let forged = JwtVerifier::new(&AuthConfig {
        jwt_secret: "not-the-secret".into(),
        issuer: None,
    })
    .sign(&Claims::new("u-1", "dance.lover", 300))
    .unwrap();

    let response = app()
        .oneshot(get("/api/v1/workspaces/dancelover", Some(&forged)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Workspaces
// ============================================================================

#[tokio::test]
async fn test_list_workspaces() {
    let response = app()
        .oneshot(get("/api/v1/workspaces", Some(&token("dance.lover"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let list: WorkspaceList = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(list.kind, "WorkspaceList");
    let names: Vec<_> = list.items.iter().map(|w| w.name()).collect();
    assert_eq!(names, vec!["broken", "dancelover"]);
}

#[tokio::test]
async fn test_get_workspace() {
    let response = app()
        .oneshot(get("/api/v1/workspaces/dancelover", Some(&token("dance.lover"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["kind"], "Workspace");
    assert_eq!(body["metadata"]["name"], "dancelover");
    assert_eq!(body["status"]["type"], "home");
    assert_eq!(body["status"]["role"], "admin");
    assert_eq!(body["status"]["availableRoles"], serde_json::json!(["admin", "viewer"]));
    assert_eq!(
        body["status"]["bindings"],
        serde_json::json!([{ "masterUserRecord": "dancelover", "role": "admin" }])
    );
}

#[tokio::test]
async fn test_get_unknown_workspace_is_404() {
    let response = app()
        .oneshot(get("/api/v1/workspaces/nothere", Some(&token("dance.lover"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(!body.success);
    assert_eq!(body.error.message, "workspaces \"nothere\" not found");
}

#[tokio::test]
async fn test_get_for_unknown_user_is_404() {
    let response = app()
        .oneshot(get("/api/v1/workspaces/dancelover", Some(&token("stranger"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_integrity_error_is_500() {
    let response = app()
        .oneshot(get("/api/v1/workspaces/broken", Some(&token("dance.lover"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "expected only 1 spacebinding, got 2 for user dancelover and workspace broken"
    );
    assert_eq!(body["error"]["code"], "DUPLICATE_SPACE_BINDING");
}

// ============================================================================
// Request Id
// ============================================================================

#[tokio::test]
async fn test_request_id_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_request_id_generated() {
    let response = app().oneshot(get("/health", None)).await.unwrap();
    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
