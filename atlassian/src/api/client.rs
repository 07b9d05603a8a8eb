use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::common::{error_message, ApiQueryParams};
use super::error::ApiError;

/// Path of the Jira Cloud REST API below the site URL
pub const API_PATH: &str = "/rest/api/3";

/// Jira Cloud REST client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    username: String,
    token: String,
    config: ClientConfig,
}

/// HTTP tuning for the REST client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_idle_connections: usize,
    pub tcp_keepalive: Option<Duration>,
    /// Retries for requests that never reached the server
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(90),
            max_idle_connections: 10,
            tcp_keepalive: Some(Duration::from_secs(30)),
            max_retries: 2,
            initial_backoff_ms: 100,
            max_backoff_ms: 2000,
        }
    }
}

impl ClientConfig {
    fn build_http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.idle_timeout)
            .pool_max_idle_per_host(self.max_idle_connections);

        if let Some(keepalive) = self.tcp_keepalive {
            builder = builder.tcp_keepalive(keepalive);
        }

        builder.build()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("username", &self.inner.username)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(site_url: &str, username: &str, token: &str) -> Result<Self, ApiError> {
        Self::with_config(site_url, username, token, ClientConfig::default())
    }

    /// Create a new API client with custom HTTP configuration
    pub fn with_config(
        site_url: &str,
        username: &str,
        token: &str,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        let site = site_url.trim_end_matches('/');
        url::Url::parse(site).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", site, e)))?;

        let http_client = config.build_http_client()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: format!("{}{}", site, API_PATH),
                username: username.to_string(),
                token: token.to_string(),
                config,
            }),
        })
    }

    /// `{site}/rest/api/3`, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Execute a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_with_retry(
            || {
                let url = format!("{}{}", self.inner.base_url, path);
                tracing::debug!("GET request to: {}", url);
                self.authorized(self.inner.http_client.get(&url)).send()
            },
            path,
        )
        .await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_params<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        self.get(&full_path).await
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute_with_retry(
            || {
                let url = format!("{}{}", self.inner.base_url, path);
                tracing::debug!("POST request to: {}", url);
                self.authorized(self.inner.http_client.post(&url))
                    .json(body)
                    .send()
            },
            path,
        )
        .await
    }

    /// Execute a POST request with query parameters and a JSON body
    pub async fn post_with_params<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        params: &ApiQueryParams,
        body: &B,
    ) -> Result<T, ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        self.post(&full_path, body).await
    }

    /// Execute a PUT request with a JSON body
    pub async fn put<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute_with_retry(
            || {
                let url = format!("{}{}", self.inner.base_url, path);
                tracing::debug!("PUT request to: {}", url);
                self.authorized(self.inner.http_client.put(&url))
                    .json(body)
                    .send()
            },
            path,
        )
        .await
    }

    /// Execute a DELETE request, discarding any response body
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute_with_retry::<_, _, serde_json::Value>(
            || {
                let url = format!("{}{}", self.inner.base_url, path);
                tracing::debug!("DELETE request to: {}", url);
                self.authorized(self.inner.http_client.delete(&url)).send()
            },
            path,
        )
        .await
        .map(|_| ())
    }

    /// Execute a DELETE request with query parameters
    pub async fn delete_with_params(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<(), ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        self.delete(&full_path).await
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .basic_auth(&self.inner.username, Some(&self.inner.token))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Execute request, retrying only when the connection could not be made
    async fn execute_with_retry<F, Fut, T>(&self, request_fn: F, path: &str) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
        T: for<'de> Deserialize<'de>,
    {
        let config = &self.inner.config;
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    config.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    config.max_backoff_ms,
                );
                tracing::debug!(
                    "Retrying request to {} after {}ms (attempt {})",
                    path,
                    backoff,
                    attempt
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            match request_fn().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return self.parse_success_response(response).await;
                    }
                    return self.handle_error_response(response).await;
                }
                Err(e) if e.is_connect() && attempt < config.max_retries => {
                    tracing::debug!("Connection to {} failed: {}", path, e);
                }
                Err(e) => return Err(ApiError::RequestError(e)),
            }

            attempt += 1;
        }
    }

    /// Parse successful response; an empty body reads as JSON `null`
    async fn parse_success_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        let text = if text.trim().is_empty() { "null" } else { &text };
        serde_json::from_str::<T>(text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }

    /// Map a non-success response onto an error, keeping the body
    async fn handle_error_response<T>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("API error response (HTTP {}): {}", status, body);

        let message = error_message(status, &body);
        match status {
            401 => Err(ApiError::AuthError),
            404 => Err(ApiError::NotFound { message, body }),
            _ => Err(ApiError::ApiError {
                status,
                message,
                body,
            }),
        }
    }

    pub fn groups(&self) -> super::groups::GroupsApi<'_> {
        super::groups::GroupsApi::new(self)
    }

    pub fn issue_types(&self) -> super::issue_types::IssueTypesApi<'_> {
        super::issue_types::IssueTypesApi::new(self)
    }

    pub fn issue_type_schemes(&self) -> super::issue_type_schemes::IssueTypeSchemesApi<'_> {
        super::issue_type_schemes::IssueTypeSchemesApi::new(self)
    }

    pub fn screens(&self) -> super::screens::ScreensApi<'_> {
        super::screens::ScreensApi::new(self)
    }

    pub fn screen_schemes(&self) -> super::screen_schemes::ScreenSchemesApi<'_> {
        super::screen_schemes::ScreenSchemesApi::new(self)
    }

    pub fn issue_type_screen_schemes(
        &self,
    ) -> super::issue_type_screen_schemes::IssueTypeScreenSchemesApi<'_> {
        super::issue_type_screen_schemes::IssueTypeScreenSchemesApi::new(self)
    }

    pub fn field_configurations(&self) -> super::field_configurations::FieldConfigurationsApi<'_> {
        super::field_configurations::FieldConfigurationsApi::new(self)
    }

    pub fn field_configuration_schemes(
        &self,
    ) -> super::field_configuration_schemes::FieldConfigurationSchemesApi<'_> {
        super::field_configuration_schemes::FieldConfigurationSchemesApi::new(self)
    }

    pub fn permission_schemes(&self) -> super::permission_schemes::PermissionSchemesApi<'_> {
        super::permission_schemes::PermissionSchemesApi::new(self)
    }

    pub fn project_categories(&self) -> super::project_categories::ProjectCategoriesApi<'_> {
        super::project_categories::ProjectCategoriesApi::new(self)
    }

    pub fn statuses(&self) -> super::statuses::StatusesApi<'_> {
        super::statuses::StatusesApi::new(self)
    }

    /// Account and instance information
    pub fn system(&self) -> super::system::SystemApi<'_> {
        super::system::SystemApi::new(self)
    }
}
