//! Issue type API

use serde::{Deserialize, Serialize};

use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hierarchy_level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<i64>,
    #[serde(default)]
    pub subtask: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueTypeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hierarchy_level: i64,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueTypeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<i64>,
}

pub struct IssueTypesApi<'a> {
    client: &'a Client,
}

impl<'a> IssueTypesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/issuetype
    pub async fn create(&self, request: &CreateIssueTypeRequest) -> Result<IssueType, ApiError> {
        self.client.post("/issuetype", request).await
    }

    /// GET /rest/api/3/issuetype/{id}
    pub async fn get(&self, id: &str) -> Result<IssueType, ApiError> {
        self.client.get(&format!("/issuetype/{}", id)).await
    }

    /// PUT /rest/api/3/issuetype/{id}
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateIssueTypeRequest,
    ) -> Result<IssueType, ApiError> {
        self.client.put(&format!("/issuetype/{}", id), request).await
    }

    /// DELETE /rest/api/3/issuetype/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/issuetype/{}", id)).await
    }
}
