//! HTTP API.
//!
//! - `GET /api/v1/workspaces`: workspaces visible to the caller
//! - `GET /api/v1/workspaces/:workspace`: one workspace with roles and bindings
//! - `GET /health`, `GET /metrics`: unauthenticated
//!
//! Workspace routes require `Authorization: Bearer <JWT>`.

pub mod auth;
mod handlers;
pub mod middleware;

use axum::{extract::FromRef, middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::telemetry::MetricsRegistry;
use crate::workspace::SpaceLister;

pub use auth::{AuthError, AuthenticatedCaller, Claims, JwtVerifier};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub lister: Arc<SpaceLister>,
    pub verifier: Arc<JwtVerifier>,
    pub metrics: MetricsRegistry,
}

impl AppState {
    pub fn new(lister: SpaceLister, verifier: JwtVerifier, metrics: MetricsRegistry) -> Self {
        Self {
            lister: Arc::new(lister),
            verifier: Arc::new(verifier),
            metrics,
        }
    }
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.verifier)
    }
}

fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces", get(handlers::list_workspaces))
        .route("/workspaces/:workspace", get(handlers::get_workspace))
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::prometheus_metrics))
        .nest("/api/v1", workspace_routes())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::request_id))
        .layer(cors)
        .with_state(state)
}
