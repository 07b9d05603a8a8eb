//! Issue type screen scheme API

use futures::Stream;
use serde::{Deserialize, Serialize};

use super::common::{paginate, ApiQueryParams, PageBean, DEFAULT_PAGE_SIZE};
use super::{ApiError, Client};

/// Issue type id that maps the fallback screen scheme
pub const DEFAULT_ISSUE_TYPE: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueTypeScreenScheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeScreenSchemeMapping {
    pub issue_type_id: String,
    pub screen_scheme_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueTypeScreenSchemeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub issue_type_mappings: Vec<IssueTypeScreenSchemeMapping>,
}

#[derive(Debug, Serialize)]
pub struct UpdateIssueTypeScreenSchemeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssueTypeScreenScheme {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MappingsBody<'a> {
    issue_type_mappings: &'a [IssueTypeScreenSchemeMapping],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DefaultMappingBody<'a> {
    screen_scheme_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveMappingsBody<'a> {
    issue_type_ids: &'a [String],
}

pub struct IssueTypeScreenSchemesApi<'a> {
    client: &'a Client,
}

impl<'a> IssueTypeScreenSchemesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/issuetypescreenscheme, returning the new scheme id
    pub async fn create(
        &self,
        request: &CreateIssueTypeScreenSchemeRequest,
    ) -> Result<String, ApiError> {
        let created: CreatedIssueTypeScreenScheme =
            self.client.post("/issuetypescreenscheme", request).await?;
        Ok(created.id)
    }

    /// GET /rest/api/3/issuetypescreenscheme?id={id}
    pub async fn get(&self, id: &str) -> Result<Option<IssueTypeScreenScheme>, ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        let page: PageBean<IssueTypeScreenScheme> = self
            .client
            .get_with_params("/issuetypescreenscheme", &params)
            .await?;
        Ok(page.values.into_iter().find(|s| s.id == id))
    }

    /// GET /rest/api/3/issuetypescreenscheme/mapping?issueTypeScreenSchemeId={id}
    pub fn mappings(
        &self,
        id: &str,
    ) -> impl Stream<Item = Result<Vec<IssueTypeScreenSchemeMapping>, ApiError>> + 'a {
        let client = self.client;
        let id = id.to_string();
        paginate(DEFAULT_PAGE_SIZE, move |page| {
            let params = page.apply(ApiQueryParams::new().add("issueTypeScreenSchemeId", &id));
            async move {
                client
                    .get_with_params::<PageBean<IssueTypeScreenSchemeMapping>>(
                        "/issuetypescreenscheme/mapping",
                        &params,
                    )
                    .await
            }
        })
    }

    /// PUT /rest/api/3/issuetypescreenscheme/{id}
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateIssueTypeScreenSchemeRequest,
    ) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(&format!("/issuetypescreenscheme/{}", id), request)
            .await
            .map(|_| ())
    }

    /// PUT /rest/api/3/issuetypescreenscheme/{id}/mapping
    pub async fn append_mappings(
        &self,
        id: &str,
        mappings: &[IssueTypeScreenSchemeMapping],
    ) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(
                &format!("/issuetypescreenscheme/{}/mapping", id),
                &MappingsBody {
                    issue_type_mappings: mappings,
                },
            )
            .await
            .map(|_| ())
    }

    /// PUT /rest/api/3/issuetypescreenscheme/{id}/mapping/default
    pub async fn set_default(&self, id: &str, screen_scheme_id: &str) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(
                &format!("/issuetypescreenscheme/{}/mapping/default", id),
                &DefaultMappingBody { screen_scheme_id },
            )
            .await
            .map(|_| ())
    }

    /// POST /rest/api/3/issuetypescreenscheme/{id}/mapping/remove
    pub async fn remove_mappings(&self, id: &str, issue_type_ids: &[String]) -> Result<(), ApiError> {
        self.client
            .post::<serde_json::Value, _>(
                &format!("/issuetypescreenscheme/{}/mapping/remove", id),
                &RemoveMappingsBody { issue_type_ids },
            )
            .await
            .map(|_| ())
    }

    /// DELETE /rest/api/3/issuetypescreenscheme/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/issuetypescreenscheme/{}", id))
            .await
    }
}
