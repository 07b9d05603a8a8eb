//! Terraform provider for Atlassian Jira Cloud
//!
//! `AtlassianProvider` authenticates a Jira REST client from its configuration and hands it
//! to every resource and data source as [`AtlassianProviderData`].

pub mod api;
pub mod data_sources;
pub mod provider_data;
pub mod resources;

pub use provider_data::AtlassianProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::DataSourceWithConfigure;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory, ValidateProviderConfigRequest,
    ValidateProviderConfigResponse,
};
use tfplug::resource::ManagedResource;
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue, ServerCapabilities};
use tfplug::validator::UrlWithScheme;

use crate::data_sources::*;
use crate::resources::*;

pub const URL_ENV: &str = "ATLASSIAN_URL";
pub const USERNAME_ENV: &str = "ATLASSIAN_USERNAME";
pub const TOKEN_ENV: &str = "ATLASSIAN_TOKEN";

/// A provider-level setting and where it falls back to
struct Setting {
    attribute: &'static str,
    env: &'static str,
    label: &'static str,
}

const URL: Setting = Setting {
    attribute: "url",
    env: URL_ENV,
    label: "URL",
};

const USERNAME: Setting = Setting {
    attribute: "username",
    env: USERNAME_ENV,
    label: "Username",
};

const TOKEN: Setting = Setting {
    attribute: "apitoken",
    env: TOKEN_ENV,
    label: "Token",
};

impl Setting {
    /// Config value, or the environment when the attribute is null
    fn resolve(&self, config: &DynamicValue) -> Result<String, Diagnostic> {
        let path = AttributePath::new(self.attribute);
        let value = match config.get(&path) {
            Ok(Dynamic::Unknown) => return Err(self.unknown()),
            Ok(Dynamic::String(s)) => Some(s.clone()),
            _ => std::env::var(self.env).ok(),
        };
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(self.missing()),
        }
    }

    fn unknown(&self) -> Diagnostic {
        Diagnostic::error(
            format!("Unknown Atlassian API {}", self.label),
            format!(
                "The provider cannot create the Atlassian API client as there is an unknown \
                 configuration value for the Atlassian API {}. Either apply the source of the \
                 value first, set the value statically in the configuration, or use the {} \
                 environment variable.",
                self.label, self.env
            ),
        )
        .with_attribute(AttributePath::new(self.attribute))
    }

    fn missing(&self) -> Diagnostic {
        Diagnostic::error(
            format!("Missing Atlassian API {}", self.label),
            format!(
                "The provider cannot create the Atlassian API client as there is a missing or \
                 empty value for the Atlassian API {}. Set the {} value in the configuration or \
                 use the {} environment variable.",
                self.label, self.attribute, self.env
            ),
        )
        .with_attribute(AttributePath::new(self.attribute))
    }
}

fn url_checker() -> UrlWithScheme {
    UrlWithScheme {
        schemes: vec!["http".to_string(), "https".to_string()],
    }
}

#[derive(Default)]
pub struct AtlassianProvider;

impl AtlassianProvider {
    pub fn new() -> Self {
        Self
    }
}

fn resource<R>() -> ResourceFactory
where
    R: ManagedResource + Default + 'static,
{
    Box::new(|| Box::new(R::default()) as Box<dyn ManagedResource>)
}

fn data_source<D>() -> DataSourceFactory
where
    D: DataSourceWithConfigure + Default + 'static,
{
    Box::new(|| Box::new(D::default()) as Box<dyn DataSourceWithConfigure>)
}

#[async_trait]
impl Provider for AtlassianProvider {
    fn type_name(&self) -> &str {
        "atlassian"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
            server_capabilities: ServerCapabilities {
                plan_destroy: false,
                get_provider_schema_optional: false,
                move_resource_state: false,
            },
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Interact with Atlassian Jira Cloud")
            .attribute(
                AttributeBuilder::new("url", AttributeType::String)
                    .description(
                        "URL of the Jira Cloud site, e.g. https://example.atlassian.net. \
                         May also be provided via the ATLASSIAN_URL environment variable.",
                    )
                    .optional()
                    .validator(Box::new(url_checker()))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("username", AttributeType::String)
                    .description(
                        "Email address of the Atlassian account. May also be provided via the \
                         ATLASSIAN_USERNAME environment variable.",
                    )
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("apitoken", AttributeType::String)
                    .description(
                        "API token of the Atlassian account. May also be provided via the \
                         ATLASSIAN_TOKEN environment variable.",
                    )
                    .optional()
                    .sensitive()
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        ValidateProviderConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let mut diagnostics = vec![];
        let mut resolve = |setting: &Setting| match setting.resolve(&request.config) {
            Ok(value) => Some(value),
            Err(diag) => {
                diagnostics.push(diag);
                None
            }
        };

        let (url, username, token) = match (resolve(&URL), resolve(&USERNAME), resolve(&TOKEN)) {
            (Some(url), Some(username), Some(token)) => (url, username, token),
            _ => {
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        };

        if let Err(reason) = url_checker().check(&url) {
            diagnostics.push(
                Diagnostic::error("Invalid Atlassian API URL", reason)
                    .with_attribute(AttributePath::new("url")),
            );
            return ConfigureProviderResponse {
                diagnostics,
                provider_data: None,
            };
        }

        tracing::debug!(url = %url, username = %username, "creating Atlassian API client");

        match api::Client::new(&url, &username, &token) {
            Ok(client) => {
                tracing::info!("Atlassian provider configured for {}", url);
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: Some(Arc::new(AtlassianProviderData::new(client))),
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Unable to Create Atlassian API Client",
                    format!("An unexpected error occurred when creating the Atlassian API client: {}", e),
                ));
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        HashMap::from([
            ("atlassian_jira_group".to_string(), resource::<GroupResource>()),
            ("atlassian_jira_group_user".to_string(), resource::<GroupUserResource>()),
            ("atlassian_jira_issue_type".to_string(), resource::<IssueTypeResource>()),
            (
                "atlassian_jira_issue_type_scheme".to_string(),
                resource::<IssueTypeSchemeResource>(),
            ),
            ("atlassian_jira_issue_screen".to_string(), resource::<IssueScreenResource>()),
            ("atlassian_jira_screen_scheme".to_string(), resource::<ScreenSchemeResource>()),
            (
                "atlassian_jira_issue_type_screen_scheme".to_string(),
                resource::<IssueTypeScreenSchemeResource>(),
            ),
            (
                "atlassian_jira_issue_field_configuration".to_string(),
                resource::<FieldConfigurationResource>(),
            ),
            (
                "atlassian_jira_issue_field_configuration_item".to_string(),
                resource::<FieldConfigurationItemResource>(),
            ),
            (
                "atlassian_jira_issue_field_configuration_scheme".to_string(),
                resource::<FieldConfigurationSchemeResource>(),
            ),
            (
                "atlassian_jira_issue_field_configuration_scheme_mapping".to_string(),
                resource::<FieldConfigurationSchemeMappingResource>(),
            ),
            (
                "atlassian_jira_permission_scheme".to_string(),
                resource::<PermissionSchemeResource>(),
            ),
            (
                "atlassian_jira_permission_grant".to_string(),
                resource::<PermissionGrantResource>(),
            ),
            (
                "atlassian_jira_project_category".to_string(),
                resource::<ProjectCategoryResource>(),
            ),
            ("atlassian_jira_status".to_string(), resource::<StatusResource>()),
        ])
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        HashMap::from([
            ("atlassian_jira_group".to_string(), data_source::<GroupDataSource>()),
            ("atlassian_jira_issue_type".to_string(), data_source::<IssueTypeDataSource>()),
            (
                "atlassian_jira_issue_type_scheme".to_string(),
                data_source::<IssueTypeSchemeDataSource>(),
            ),
            ("atlassian_jira_issue_screen".to_string(), data_source::<IssueScreenDataSource>()),
            ("atlassian_jira_screen_scheme".to_string(), data_source::<ScreenSchemeDataSource>()),
            (
                "atlassian_jira_issue_type_screen_scheme".to_string(),
                data_source::<IssueTypeScreenSchemeDataSource>(),
            ),
            (
                "atlassian_jira_issue_field_configuration".to_string(),
                data_source::<FieldConfigurationDataSource>(),
            ),
            (
                "atlassian_jira_issue_field_configuration_scheme".to_string(),
                data_source::<FieldConfigurationSchemeDataSource>(),
            ),
            (
                "atlassian_jira_permission_scheme".to_string(),
                data_source::<PermissionSchemeDataSource>(),
            ),
            (
                "atlassian_jira_project_category".to_string(),
                data_source::<ProjectCategoryDataSource>(),
            ),
            ("atlassian_jira_status".to_string(), data_source::<StatusDataSource>()),
            ("atlassian_jira_myself".to_string(), data_source::<MyselfDataSource>()),
            ("atlassian_jira_server_info".to_string(), data_source::<ServerInfoDataSource>()),
        ])
    }
}
