//! Current account and instance information

use serde::{Deserialize, Serialize};

use super::{ApiError, Client};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Myself {
    pub account_id: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub base_url: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub build_number: i64,
    #[serde(default)]
    pub deployment_type: String,
    #[serde(default)]
    pub server_title: String,
}

pub struct SystemApi<'a> {
    client: &'a Client,
}

impl<'a> SystemApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /rest/api/3/myself
    pub async fn myself(&self) -> Result<Myself, ApiError> {
        self.client.get("/myself").await
    }

    /// GET /rest/api/3/serverInfo
    pub async fn server_info(&self) -> Result<ServerInfo, ApiError> {
        self.client.get("/serverInfo").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::Server;

    #[tokio::test]
    async fn myself_parses_account() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/myself")
            .with_body(
                r#"{"accountId":"5b10a2844c20165700ede21g","accountType":"atlassian","active":true,
                    "displayName":"Mia Krystof","emailAddress":"mia@example.com","timeZone":"Australia/Sydney","locale":"en_US"}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let me = client.system().myself().await.unwrap();
        assert_eq!(me.display_name, "Mia Krystof");
        assert_eq!(me.time_zone.as_deref(), Some("Australia/Sydney"));
    }

    #[tokio::test]
    async fn server_info_parses_build() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/serverInfo")
            .with_body(
                r#"{"baseUrl":"https://your-domain.atlassian.net","version":"1001.0.0-SNAPSHOT",
                    "buildNumber":100234,"deploymentType":"Cloud","serverTitle":"My Jira instance"}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let info = client.system().server_info().await.unwrap();
        assert_eq!(info.build_number, 100234);
        assert_eq!(info.deployment_type, "Cloud");
    }
}
