//! Screen scheme API

use serde::{Deserialize, Serialize};

use super::common::{ApiQueryParams, PageBean};
use super::{ApiError, Client};

/// Screens used per issue operation; `default` covers operations left unset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScreenTypes {
    pub default: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenScheme {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub screens: ScreenTypes,
}

#[derive(Debug, Serialize)]
pub struct ScreenSchemeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub screens: ScreenTypes,
}

#[derive(Debug, Deserialize)]
struct CreatedScreenScheme {
    id: i64,
}

pub struct ScreenSchemesApi<'a> {
    client: &'a Client,
}

impl<'a> ScreenSchemesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/screenscheme, returning the new scheme id
    pub async fn create(&self, request: &ScreenSchemeRequest) -> Result<i64, ApiError> {
        let created: CreatedScreenScheme = self.client.post("/screenscheme", request).await?;
        Ok(created.id)
    }

    /// GET /rest/api/3/screenscheme?id={id}
    pub async fn get(&self, id: &str) -> Result<Option<ScreenScheme>, ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        let page: PageBean<ScreenScheme> =
            self.client.get_with_params("/screenscheme", &params).await?;
        Ok(page.values.into_iter().find(|s| s.id.to_string() == id))
    }

    /// PUT /rest/api/3/screenscheme/{id}
    pub async fn update(&self, id: &str, request: &ScreenSchemeRequest) -> Result<(), ApiError> {
        self.client
            .put::<serde_json::Value, _>(&format!("/screenscheme/{}", id), request)
            .await
            .map(|_| ())
    }

    /// DELETE /rest/api/3/screenscheme/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/screenscheme/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn create_sends_only_set_screens() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/3/screenscheme")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Scheme",
                "screens": {"default": 10000, "edit": 10001}
            })))
            .with_status(201)
            .with_body(r#"{"id":10010}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let id = client
            .screen_schemes()
            .create(&ScreenSchemeRequest {
                name: "Scheme".to_string(),
                description: None,
                screens: ScreenTypes {
                    default: 10000,
                    edit: Some(10001),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(id, 10010);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_parses_screens() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/screenscheme")
            .match_query(Matcher::UrlEncoded("id".into(), "10010".into()))
            .with_body(
                r#"{"isLast":true,"values":[{"id":10010,"name":"Scheme","screens":{"default":10000,"view":10002}}]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let scheme = client.screen_schemes().get("10010").await.unwrap().unwrap();
        assert_eq!(scheme.screens.default, 10000);
        assert_eq!(scheme.screens.view, Some(10002));
        assert_eq!(scheme.screens.create, None);
    }
}
