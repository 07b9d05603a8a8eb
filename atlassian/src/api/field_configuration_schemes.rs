//! Field configuration scheme API

use futures::Stream;
use serde::{Deserialize, Serialize};

use super::common::{paginate, ApiQueryParams, PageBean, DEFAULT_PAGE_SIZE};
use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldConfigurationScheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldConfigurationSchemeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Issue type to field configuration link inside a scheme
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfigurationSchemeMapping {
    pub field_configuration_scheme_id: String,
    pub field_configuration_id: String,
    pub issue_type_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MappingItem<'a> {
    issue_type_id: &'a str,
    field_configuration_id: &'a str,
}

#[derive(Debug, Serialize)]
struct MappingsBody<'a> {
    mappings: Vec<MappingItem<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnlinkBody<'a> {
    issue_type_ids: Vec<&'a str>,
}

pub struct FieldConfigurationSchemesApi<'a> {
    client: &'a Client,
}

impl<'a> FieldConfigurationSchemesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/fieldconfigurationscheme
    pub async fn create(
        &self,
        request: &FieldConfigurationSchemeRequest,
    ) -> Result<FieldConfigurationScheme, ApiError> {
        self.client.post("/fieldconfigurationscheme", request).await
    }

    /// GET /rest/api/3/fieldconfigurationscheme?id={id}
    pub async fn get(&self, id: &str) -> Result<Option<FieldConfigurationScheme>, ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        let page: PageBean<FieldConfigurationScheme> = self
            .client
            .get_with_params("/fieldconfigurationscheme", &params)
            .await?;
        Ok(page.values.into_iter().find(|s| s.id == id))
    }

    /// PUT /rest/api/3/fieldconfigurationscheme/{id}
    pub async fn update(
        &self,
        id: &str,
        request: &FieldConfigurationSchemeRequest,
    ) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(&format!("/fieldconfigurationscheme/{}", id), request)
            .await
            .map(|_| ())
    }

    /// DELETE /rest/api/3/fieldconfigurationscheme/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/fieldconfigurationscheme/{}", id))
            .await
    }

    /// GET /rest/api/3/fieldconfigurationscheme/mapping?fieldConfigurationSchemeId={id}
    pub fn mappings(
        &self,
        id: &str,
    ) -> impl Stream<Item = Result<Vec<FieldConfigurationSchemeMapping>, ApiError>> + 'a {
        let client = self.client;
        let id = id.to_string();
        paginate(DEFAULT_PAGE_SIZE, move |page| {
            let params = page.apply(ApiQueryParams::new().add("fieldConfigurationSchemeId", &id));
            async move {
                client
                    .get_with_params::<PageBean<FieldConfigurationSchemeMapping>>(
                        "/fieldconfigurationscheme/mapping",
                        &params,
                    )
                    .await
            }
        })
    }

    /// PUT /rest/api/3/fieldconfigurationscheme/{id}/mapping
    pub async fn link(
        &self,
        id: &str,
        issue_type_id: &str,
        field_configuration_id: &str,
    ) -> Result<(), ApiError> {
        let body = MappingsBody {
            mappings: vec![MappingItem {
                issue_type_id,
                field_configuration_id,
            }],
        };
        self.client
            .put::<serde_json::Value, _>(&format!("/fieldconfigurationscheme/{}/mapping", id), &body)
            .await
            .map(|_| ())
    }

    /// POST /rest/api/3/fieldconfigurationscheme/{id}/mapping/delete
    pub async fn unlink(&self, id: &str, issue_type_id: &str) -> Result<(), ApiError> {
        let body = UnlinkBody {
            issue_type_ids: vec![issue_type_id],
        };
        self.client
            .post::<serde_json::Value, _>(
                &format!("/fieldconfigurationscheme/{}/mapping/delete", id),
                &body,
            )
            .await
            .map(|_| ())
    }
}
