//! Screen API

use serde::{Deserialize, Serialize};

use super::common::{ApiQueryParams, PageBean};
use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Screen {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScreenRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct ScreensApi<'a> {
    client: &'a Client,
}

impl<'a> ScreensApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /rest/api/3/screens
    pub async fn create(&self, request: &ScreenRequest) -> Result<Screen, ApiError> {
        self.client.post("/screens", request).await
    }

    /// GET /rest/api/3/screens?id={id}
    pub async fn get(&self, id: &str) -> Result<Option<Screen>, ApiError> {
        let params = ApiQueryParams::new().add("id", id);
        let page: PageBean<Screen> = self.client.get_with_params("/screens", &params).await?;
        Ok(page.values.into_iter().find(|s| s.id.to_string() == id))
    }

    /// PUT /rest/api/3/screens/{id}
    pub async fn update(&self, id: &str, request: &ScreenRequest) -> Result<Screen, ApiError> {
        self.client.put(&format!("/screens/{}", id), request).await
    }

    /// DELETE /rest/api/3/screens/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/screens/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn screen_lifecycle() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/rest/api/3/screens")
            .match_body(Matcher::Json(serde_json::json!({"name": "Default"})))
            .with_status(201)
            .with_body(r#"{"id":10005,"name":"Default"}"#)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/rest/api/3/screens")
            .match_query(Matcher::UrlEncoded("id".into(), "10005".into()))
            .with_body(r#"{"isLast":true,"values":[{"id":10005,"name":"Default","description":"d"}]}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/api/3/screens/10005")
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let screens = client.screens();
        let created = screens
            .create(&ScreenRequest {
                name: "Default".to_string(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 10005);

        let fetched = screens.get("10005").await.unwrap().unwrap();
        assert_eq!(fetched.description.as_deref(), Some("d"));

        screens.delete("10005").await.unwrap();

        create.assert_async().await;
        get.assert_async().await;
        delete.assert_async().await;
    }
}
