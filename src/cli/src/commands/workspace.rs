//! Workspace commands.
//!
//! Lists the caller's workspaces and shows a single workspace with its roles
//! and bindings.

use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// List the workspaces you can access
    List,

    /// Show a workspace with its available roles and bindings
    Get {
        /// Workspace name
        name: String,
    },
}

// ── API response types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceInfo {
    name: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    namespace_type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct RequestRef {
    name: String,
    namespace: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct BindingInfo {
    master_user_record: String,
    role: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    available_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binding_request: Option<RequestRef>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceStatus {
    #[serde(default)]
    owner: String,
    #[serde(default)]
    role: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    workspace_type: Option<String>,
    #[serde(default)]
    namespaces: Vec<NamespaceInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    available_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bindings: Vec<BindingInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct Metadata {
    name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct WorkspaceInfo {
    metadata: Metadata,
    #[serde(default)]
    status: WorkspaceStatus,
}

#[derive(Debug, Deserialize)]
struct WorkspaceListResponse {
    #[serde(default)]
    items: Vec<WorkspaceInfo>,
}

// ── Table rows ──────────────────────────────────────────────────────────────

#[derive(Debug, Tabled)]
struct WorkspaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Type")]
    workspace_type: String,
    #[tabled(rename = "Namespaces")]
    namespaces: String,
}

impl From<&WorkspaceInfo> for WorkspaceRow {
    fn from(ws: &WorkspaceInfo) -> Self {
        Self {
            name: ws.metadata.name.clone(),
            owner: ws.status.owner.clone(),
            role: ws.status.role.clone(),
            workspace_type: ws.status.workspace_type.clone().unwrap_or_else(|| "-".into()),
            namespaces: join_or_dash(ws.status.namespaces.iter().map(|n| n.name.as_str())),
        }
    }
}

#[derive(Debug, Tabled)]
struct BindingRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Actions")]
    actions: String,
    #[tabled(rename = "Request")]
    request: String,
}

impl From<&BindingInfo> for BindingRow {
    fn from(b: &BindingInfo) -> Self {
        Self {
            user: b.master_user_record.clone(),
            role: b.role.clone(),
            actions: join_or_dash(b.available_actions.iter().map(String::as_str)),
            request: b
                .binding_request
                .as_ref()
                .map(|r| format!("{}/{}", r.namespace, r.name))
                .unwrap_or_else(|| "-".into()),
        }
    }
}

fn join_or_dash<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined = parts.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

// ── Execution ───────────────────────────────────────────────────────────────

async fn fetch_list(client: &ApiClient) -> Result<Vec<WorkspaceInfo>> {
    let list: WorkspaceListResponse = client.get("/api/v1/workspaces").await?;
    Ok(list.items)
}

async fn fetch_one(client: &ApiClient, name: &str) -> Result<WorkspaceInfo> {
    client.get(&format!("/api/v1/workspaces/{}", name)).await
}

pub async fn execute(cmd: WorkspaceCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        WorkspaceCommands::List => {
            let items = fetch_list(client).await?;
            let rows: Vec<WorkspaceRow> = items.iter().map(WorkspaceRow::from).collect();
            output::print_list(&rows, &items, format)?;
        }

        WorkspaceCommands::Get { name } => {
            let ws = fetch_one(client, &name).await?;

            match format {
                OutputFormat::Table => {
                    let row = WorkspaceRow::from(&ws);
                    output::print_header(&format!("Workspace {}", row.name));
                    output::print_detail("Owner", &row.owner);
                    output::print_detail("Role", &row.role);
                    output::print_detail("Type", &row.workspace_type);
                    output::print_detail("Namespaces", &row.namespaces);
                    output::print_detail(
                        "Available roles",
                        &join_or_dash(ws.status.available_roles.iter().map(String::as_str)),
                    );

                    let bindings: Vec<BindingRow> =
                        ws.status.bindings.iter().map(BindingRow::from).collect();
                    output::print_header("Bindings");
                    output::print_list(&bindings, &ws.status.bindings, format)?;
                }
                _ => output::print_item(&ws, format)?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "kind": "Workspace",
            "apiVersion": "toolchain.dev.openshift.com/v1alpha1",
            "metadata": { "name": "dancelover" },
            "status": {
                "owner": "dancelover",
                "role": "admin",
                "type": "home",
                "namespaces": [{ "name": "dancelover-dev", "type": "default" }],
                "availableRoles": ["admin", "viewer"],
                "bindings": [
                    { "masterUserRecord": "animelover", "role": "viewer",
                      "availableActions": ["update", "delete"],
                      "bindingRequest": { "name": "animelover-sbr", "namespace": "dancelover-dev" } },
                    { "masterUserRecord": "dancelover", "role": "admin" }
                ]
            }
        })
    }

    #[test]
    fn test_rows_from_workspace() {
        let ws: WorkspaceInfo = serde_json::from_value(sample()).unwrap();
        let row = WorkspaceRow::from(&ws);
        assert_eq!(row.workspace_type, "home");
        assert_eq!(row.namespaces, "dancelover-dev");

        let bindings: Vec<BindingRow> = ws.status.bindings.iter().map(BindingRow::from).collect();
        assert_eq!(bindings[0].actions, "update, delete");
        assert_eq!(bindings[0].request, "dancelover-dev/animelover-sbr");
        assert_eq!(bindings[1].actions, "-");
        assert_eq!(bindings[1].request, "-");
    }

    #[test]
    fn test_list_projection_row() {
        let ws: WorkspaceInfo = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "movielover" },
            "status": { "owner": "movielover", "role": "other" }
        }))
        .unwrap();
        let row = WorkspaceRow::from(&ws);
        assert_eq!(row.workspace_type, "-");
        assert_eq!(row.namespaces, "-");
    }

    #[tokio::test]
    async fn test_fetch_list_and_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/workspaces"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "WorkspaceList",
                "apiVersion": "toolchain.dev.openshift.com/v1alpha1",
                "items": [sample()]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/workspaces/dancelover"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample()))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("t".into())).unwrap();
        let items = fetch_list(&client).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].metadata.name, "dancelover");

        let ws = fetch_one(&client, "dancelover").await.unwrap();
        assert_eq!(ws.status.available_roles, vec!["admin", "viewer"]);
    }
}
