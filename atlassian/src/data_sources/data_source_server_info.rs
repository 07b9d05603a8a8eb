//! Server info data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, DynamicValue};

use crate::resources::common::{
    call, client_error, configure_provider_data, not_configured, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct ServerInfoDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl ServerInfoDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ServerInfoDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_server_info"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Gets the Jira instance information")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The data source ID, same as base_url")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("base_url", AttributeType::String)
                    .description("The base URL of the Jira instance")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("version", AttributeType::String)
                    .description("The version of Jira")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("build_number", AttributeType::Number)
                    .description("The build number of the Jira version")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("deployment_type", AttributeType::String)
                    .description("The type of server deployment, always Cloud")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("server_title", AttributeType::String)
                    .description("The name of the Jira instance")
                    .computed()
                    .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn read(&self, ctx: Context, _request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let mut diagnostics = vec![];

        tracing::debug!(
            "Reading server info data source, provider_data: {:?}",
            self.provider_data.is_some()
        );

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                };
            }
        };

        match call(&ctx, provider_data.client.system().server_info()).await {
            Ok(info) => {
                let mut state = DynamicValue::object();
                let _ = state.set_string(&AttributePath::new("id"), info.base_url.clone());
                let _ = state.set_string(&AttributePath::new("base_url"), info.base_url);
                let _ = state.set_string(&AttributePath::new("version"), info.version);
                let _ = state.set_number(
                    &AttributePath::new("build_number"),
                    info.build_number as f64,
                );
                let _ = state.set_string(
                    &AttributePath::new("deployment_type"),
                    info.deployment_type,
                );
                let _ = state.set_string(&AttributePath::new("server_title"), info.server_title);

                ReadDataSourceResponse { state, diagnostics }
            }
            Err(e) => {
                diagnostics.push(client_error("read", "server info", &e));
                ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                }
            }
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for ServerInfoDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let (provider_data, diagnostics) =
            configure_provider_data(request.provider_data, HandlerKind::DataSource);
        self.provider_data = provider_data;
        ConfigureDataSourceResponse { diagnostics }
    }
}
