//! Workflow status API

use serde::{Deserialize, Serialize};

use super::common::ApiQueryParams;
use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectRef {
    pub id: String,
}

/// Where a status is visible: everywhere (`GLOBAL`) or in one project (`PROJECT`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusScope {
    #[serde(rename = "type")]
    pub scope_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

impl StatusScope {
    /// Project id of a project scope, empty for global statuses
    pub fn project_id(&self) -> String {
        self.project
            .as_ref()
            .map(|p| p.id.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status_category: String,
    pub scope: StatusScope,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCreate {
    pub name: String,
    pub status_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: String,
    pub name: String,
    pub status_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateStatusesBody<'a> {
    scope: &'a StatusScope,
    statuses: &'a [StatusCreate],
}

#[derive(Debug, Serialize)]
struct UpdateStatusesBody<'a> {
    statuses: &'a [StatusUpdate],
}

pub struct StatusesApi<'a> {
    client: &'a Client,
}

impl<'a> StatusesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/statuses
    pub async fn create(
        &self,
        scope: &StatusScope,
        statuses: &[StatusCreate],
    ) -> Result<Vec<Status>, ApiError> {
        self.client
            .post("/statuses", &CreateStatusesBody { scope, statuses })
            .await
    }

    /// GET /rest/api/3/statuses?id={id}
    pub async fn get(&self, id: &str) -> Result<Option<Status>, ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        let statuses: Vec<Status> = self.client.get_with_params("/statuses", &params).await?;
        Ok(statuses.into_iter().find(|s| s.id == id))
    }

    /// PUT /rest/api/3/statuses
    pub async fn update(&self, statuses: &[StatusUpdate]) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>("/statuses", &UpdateStatusesBody { statuses })
            .await
            .map(|_| ())
    }

    /// DELETE /rest/api/3/statuses?id={id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        self.client.delete_with_params("/statuses", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn create_global_status_omits_project() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/3/statuses")
            .match_body(Matcher::Json(serde_json::json!({
                "scope": {"type": "GLOBAL"},
                "statuses": [{"name": "Review", "statusCategory": "IN_PROGRESS", "description": " "}]
            })))
            .with_body(
                r#"[{"id":"10010","name":"Review","description":" ","statusCategory":"IN_PROGRESS","scope":{"type":"GLOBAL"}}]"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let created = client
            .statuses()
            .create(
                &StatusScope {
                    scope_type: "GLOBAL".to_string(),
                    project: None,
                },
                &[StatusCreate {
                    name: "Review".to_string(),
                    status_category: "IN_PROGRESS".to_string(),
                    description: Some(" ".to_string()),
                }],
            )
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].scope.project_id(), "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_reads_project_scope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/statuses")
            .match_query(Matcher::UrlEncoded("id".into(), "10011".into()))
            .with_body(
                r#"[{"id":"10011","name":"Triage","statusCategory":"TODO","scope":{"type":"PROJECT","project":{"id":"10000"}}}]"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let status = client.statuses().get("10011").await.unwrap().unwrap();
        assert_eq!(status.scope.scope_type, "PROJECT");
        assert_eq!(status.scope.project_id(), "10000");
    }

    #[tokio::test]
    async fn delete_passes_id_as_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/rest/api/3/statuses")
            .match_query(Matcher::UrlEncoded("id".into(), "10011".into()))
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client.statuses().delete("10011").await.unwrap();
        mock.assert_async().await;
    }
}
