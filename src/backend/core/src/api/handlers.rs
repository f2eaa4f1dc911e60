//! API request handlers.
//!
//! Workspace handlers return `Result<_, SpacesError>` so failures map to HTTP
//! statuses through the `IntoResponse` implementation on `SpacesError`.

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Json,
};

use super::auth::AuthenticatedCaller;
use super::AppState;
use crate::error::SpacesError;
use crate::model::{Workspace, WorkspaceList};
use crate::telemetry::{WorkspaceRequestTimer, WorkspaceVerb};

// ═══════════════════════════════════════════════════════════════════════════════
// Health & Metrics
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Workspace Handlers
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn list_workspaces(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<WorkspaceList>, SpacesError> {
    let timer = WorkspaceRequestTimer::start(WorkspaceVerb::List);

    match state.lister.list_user_workspaces(&caller).await {
        Ok(items) => {
            timer.finish(StatusCode::OK.as_u16());
            Ok(Json(WorkspaceList::new(items)))
        }
        Err(e) => {
            timer.finish(e.http_status().as_u16());
            Err(e)
        }
    }
}

pub async fn get_workspace(
    State(state): State<AppState>,
    Path(name): Path<String>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<Workspace>, SpacesError> {
    let timer = WorkspaceRequestTimer::start(WorkspaceVerb::Get);

    let result = state
        .lister
        .get_user_workspace(&caller, &name)
        .await
        .and_then(|ws| ws.ok_or_else(|| SpacesError::workspace_not_found(&name)));

    match result {
        Ok(workspace) => {
            timer.finish(StatusCode::OK.as_u16());
            Ok(Json(workspace))
        }
        Err(e) => {
            timer.finish(e.http_status().as_u16());
            Err(e)
        }
    }
}
