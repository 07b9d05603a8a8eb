//! Workflow status data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

use crate::api::Client;
use crate::data_sources::{computed_attribute, lookup_attribute, lookup_value, not_found, read_only};
use crate::resources::common::{
    call, client_error, configure_provider_data, not_configured, HandlerKind,
};
use crate::resources::workflows::resource_status::{scope_attributes, status_state};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct StatusDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl StatusDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(|data| data.client.as_ref())
            .ok_or_else(not_configured)
    }

    async fn lookup(&self, ctx: &Context, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = self.client()?;
        let id = lookup_value(config, "id")?;

        match call(ctx, client.statuses().get(&id)).await {
            Ok(Some(found)) => Ok(status_state(found)),
            Ok(None) => Err(not_found("status", &id)),
            Err(e) => Err(client_error("read", "status", &e)),
        }
    }
}

#[async_trait]
impl DataSource for StatusDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_status"
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
            .description("Jira Workflow Status Data Source")
            .attribute(lookup_attribute("id", "The ID of the status."))
            .attribute(computed_attribute(
                "name",
                AttributeType::String,
                "The name of the status.",
            ))
            .attribute(computed_attribute(
                "description",
                AttributeType::String,
                "The description of the status.",
            ))
            .attribute(computed_attribute(
                "status_category",
                AttributeType::String,
                "The category of the status: TODO, IN_PROGRESS or DONE.",
            ))
            .attribute(
                AttributeBuilder::single_nested("status_scope", read_only(scope_attributes()))
                    .description("The scope of the status.")
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

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        match self.lookup(&ctx, &request.config).await {
            Ok(state) => ReadDataSourceResponse {
                state,
                diagnostics: vec![],
            },
            Err(diag) => ReadDataSourceResponse {
                state: DynamicValue::null(),
                diagnostics: vec![diag],
            },
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for StatusDataSource {
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
