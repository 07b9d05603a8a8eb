//! Permission scheme and permission grant API

use serde::{Deserialize, Serialize};

use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionScheme {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PermissionSchemeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Who a permission is granted to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionHolder {
    #[serde(rename = "type")]
    pub holder_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionGrant {
    pub id: i64,
    pub holder: PermissionHolder,
    pub permission: String,
}

#[derive(Debug, Serialize)]
pub struct PermissionGrantRequest {
    pub holder: PermissionHolder,
    pub permission: String,
}

pub struct PermissionSchemesApi<'a> {
    client: &'a Client,
}

impl<'a> PermissionSchemesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/permissionscheme
    pub async fn create(&self, request: &PermissionSchemeRequest) -> Result<PermissionScheme, ApiError> {
        self.client.post("/permissionscheme", request).await
    }

    /// GET /rest/api/3/permissionscheme/{id}
    pub async fn get(&self, id: &str) -> Result<PermissionScheme, ApiError> {
        self.client.get(&format!("/permissionscheme/{}", id)).await
    }

    /// PUT /rest/api/3/permissionscheme/{id}
    pub async fn update(
        &self,
        id: &str,
        request: &PermissionSchemeRequest,
    ) -> Result<PermissionScheme, ApiError> {
        self.client
            .put(&format!("/permissionscheme/{}", id), request)
            .await
    }

    /// DELETE /rest/api/3/permissionscheme/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/permissionscheme/{}", id)).await
    }

    /// POST /rest/api/3/permissionscheme/{scheme_id}/permission
    pub async fn create_grant(
        &self,
        scheme_id: &str,
        request: &PermissionGrantRequest,
    ) -> Result<PermissionGrant, ApiError> {
        self.client
            .post(&format!("/permissionscheme/{}/permission", scheme_id), request)
            .await
    }

    /// GET /rest/api/3/permissionscheme/{scheme_id}/permission/{grant_id}
    pub async fn get_grant(&self, scheme_id: &str, grant_id: &str) -> Result<PermissionGrant, ApiError> {
        self.client
            .get(&format!(
                "/permissionscheme/{}/permission/{}",
                scheme_id, grant_id
            ))
            .await
    }

    /// DELETE /rest/api/3/permissionscheme/{scheme_id}/permission/{grant_id}
    pub async fn delete_grant(&self, scheme_id: &str, grant_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/permissionscheme/{}/permission/{}",
                scheme_id, grant_id
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn create_grant_round_trips_holder() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/3/permissionscheme/10000/permission")
            .match_body(Matcher::Json(serde_json::json!({
                "holder": {"type": "group", "parameter": "jira-admins"},
                "permission": "ADMINISTER_PROJECTS"
            })))
            .with_status(201)
            .with_body(
                r#"{"id":10100,"holder":{"type":"group","parameter":"jira-admins","value":"g-1"},"permission":"ADMINISTER_PROJECTS"}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let grant = client
            .permission_schemes()
            .create_grant(
                "10000",
                &PermissionGrantRequest {
                    holder: PermissionHolder {
                        holder_type: "group".to_string(),
                        parameter: Some("jira-admins".to_string()),
                    },
                    permission: "ADMINISTER_PROJECTS".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(grant.id, 10100);
        assert_eq!(grant.holder.parameter.as_deref(), Some("jira-admins"));
        mock.assert_async().await;
    }

    #[test]
    fn holder_without_parameter_omits_it() {
        let holder = PermissionHolder {
            holder_type: "anyone".to_string(),
            parameter: None,
        };
        assert_eq!(
            serde_json::to_value(&holder).unwrap(),
            serde_json::json!({"type": "anyone"})
        );
    }

    #[tokio::test]
    async fn get_scheme_parses_self() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/permissionscheme/10000")
            .with_body(r#"{"id":10000,"name":"Default","self":"https://x/rest/api/3/permissionscheme/10000"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let scheme = client.permission_schemes().get("10000").await.unwrap();
        assert_eq!(scheme.description, None);
        assert_eq!(
            scheme.self_url.as_deref(),
            Some("https://x/rest/api/3/permissionscheme/10000")
        );
    }
}
