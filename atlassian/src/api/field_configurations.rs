//! Field configuration, field configuration item and field search API

use futures::Stream;
use serde::{Deserialize, Serialize};

use super::common::{paginate, ApiQueryParams, PageBean, DEFAULT_PAGE_SIZE};
use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfiguration {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldConfigurationRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-field behavior within a field configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfigurationItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FieldSchema {
    #[serde(rename = "type", default)]
    pub field_type: String,
}

/// A system or custom field as returned by field search
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub schema: Option<FieldSchema>,
}

impl Field {
    /// Only free text fields accept a renderer choice
    pub fn is_renderable(&self) -> bool {
        self.schema
            .as_ref()
            .is_some_and(|s| matches!(s.field_type.as_str(), "string" | "comments-page"))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemsBody<'a> {
    field_configuration_items: &'a [FieldConfigurationItem],
}

pub struct FieldConfigurationsApi<'a> {
    client: &'a Client,
}

impl<'a> FieldConfigurationsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/fieldconfiguration
    pub async fn create(
        &self,
        request: &FieldConfigurationRequest,
    ) -> Result<FieldConfiguration, ApiError> {
        self.client.post("/fieldconfiguration", request).await
    }

    /// GET /rest/api/3/fieldconfiguration?id={id}
    pub async fn get(&self, id: &str) -> Result<Option<FieldConfiguration>, ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        let page: PageBean<FieldConfiguration> = self
            .client
            .get_with_params("/fieldconfiguration", &params)
            .await?;
        Ok(page.values.into_iter().find(|c| c.id.to_string() == id))
    }

    /// PUT /rest/api/3/fieldconfiguration/{id}
    pub async fn update(&self, id: &str, request: &FieldConfigurationRequest) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(&format!("/fieldconfiguration/{}", id), request)
            .await
            .map(|_| ())
    }

    /// DELETE /rest/api/3/fieldconfiguration/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/fieldconfiguration/{}", id)).await
    }

    /// GET /rest/api/3/fieldconfiguration/{id}/fields
    pub fn items(
        &self,
        id: &str,
    ) -> impl Stream<Item = Result<Vec<FieldConfigurationItem>, ApiError>> + 'a {
        let client = self.client;
        let path = format!("/fieldconfiguration/{}/fields", id);
        paginate(DEFAULT_PAGE_SIZE, move |page| {
            let params = page.apply(ApiQueryParams::new());
            let path = path.clone();
            async move {
                client
                    .get_with_params::<PageBean<FieldConfigurationItem>>(&path, &params)
                    .await
            }
        })
    }

    /// PUT /rest/api/3/fieldconfiguration/{id}/fields
    pub async fn update_items(
        &self,
        id: &str,
        items: &[FieldConfigurationItem],
    ) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(
                &format!("/fieldconfiguration/{}/fields", id),
                &ItemsBody {
                    field_configuration_items: items,
                },
            )
            .await
            .map(|_| ())
    }

    /// GET /rest/api/3/field/search?id={field_id}
    pub async fn search_field(&self, field_id: &str) -> Result<Option<Field>, ApiError> {
        let params = ApiQueryParams::new().add("id", field_id);
        let page: PageBean<Field> = self.client.get_with_params("/field/search", &params).await?;
        Ok(page.values.into_iter().find(|f| f.id == field_id))
    }
}
