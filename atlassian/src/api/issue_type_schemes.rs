//! Issue type scheme API

use futures::Stream;
use serde::{Deserialize, Serialize};

use super::common::{paginate, ApiQueryParams, PageBean, DEFAULT_PAGE_SIZE};
use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeScheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_issue_type_id: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeSchemeMapping {
    pub issue_type_scheme_id: String,
    pub issue_type_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueTypeSchemeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_issue_type_id: Option<String>,
    pub issue_type_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueTypeSchemeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_issue_type_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedIssueTypeScheme {
    issue_type_scheme_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueTypeIds<'a> {
    issue_type_ids: &'a [String],
}

pub struct IssueTypeSchemesApi<'a> {
    client: &'a Client,
}

impl<'a> IssueTypeSchemesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/issuetypescheme, returning the new scheme id
    pub async fn create(&self, request: &CreateIssueTypeSchemeRequest) -> Result<String, ApiError> {
        let created: CreatedIssueTypeScheme = self.client.post("/issuetypescheme", request).await?;
        Ok(created.issue_type_scheme_id)
    }

    /// GET /rest/api/3/issuetypescheme?id={id}
    pub async fn get(&self, id: &str) -> Result<Option<IssueTypeScheme>, ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        let page: PageBean<IssueTypeScheme> =
            self.client.get_with_params("/issuetypescheme", &params).await?;
        Ok(page.values.into_iter().find(|s| s.id == id))
    }

    /// GET /rest/api/3/issuetypescheme/mapping?issueTypeSchemeId={id}
    pub fn mappings(
        &self,
        id: &str,
    ) -> impl Stream<Item = Result<Vec<IssueTypeSchemeMapping>, ApiError>> + 'a {
        let client = self.client;
        let id = id.to_string();
        paginate(DEFAULT_PAGE_SIZE, move |page| {
            let params = page.apply(ApiQueryParams::new().add("issueTypeSchemeId", &id));
            async move {
                client
                    .get_with_params::<PageBean<IssueTypeSchemeMapping>>(
                        "/issuetypescheme/mapping",
                        &params,
                    )
                    .await
            }
        })
    }

    /// PUT /rest/api/3/issuetypescheme/{id}
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateIssueTypeSchemeRequest,
    ) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(&format!("/issuetypescheme/{}", id), request)
            .await
            .map(|_| ())
    }

    /// PUT /rest/api/3/issuetypescheme/{id}/issuetype
    pub async fn add_issue_types(&self, id: &str, issue_type_ids: &[String]) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(
                &format!("/issuetypescheme/{}/issuetype", id),
                &IssueTypeIds { issue_type_ids },
            )
            .await
            .map(|_| ())
    }

    /// DELETE /rest/api/3/issuetypescheme/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/issuetypescheme/{}", id)).await
    }
}
