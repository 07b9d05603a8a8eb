//! Project category API

use serde::{Deserialize, Serialize};

use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectCategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct ProjectCategoriesApi<'a> {
    client: &'a Client,
}

impl<'a> ProjectCategoriesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/projectCategory
    pub async fn create(&self, request: &ProjectCategoryRequest) -> Result<ProjectCategory, ApiError> {
        self.client.post("/projectCategory", request).await
    }

    /// GET /rest/api/3/projectCategory/{id}
    pub async fn get(&self, id: &str) -> Result<ProjectCategory, ApiError> {
        self.client.get(&format!("/projectCategory/{}", id)).await
    }

    /// PUT /rest/api/3/projectCategory/{id}
    pub async fn update(
        &self,
        id: &str,
        request: &ProjectCategoryRequest,
    ) -> Result<ProjectCategory, ApiError> {
        self.client
            .put(&format!("/projectCategory/{}", id), request)
            .await
    }

    /// DELETE /rest/api/3/projectCategory/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/projectCategory/{}", id)).await
    }
}
