//! Issue field configuration data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};

use crate::api::field_configurations::FieldConfiguration;
use crate::api::Client;
use crate::data_sources::{computed_attribute, lookup_attribute, lookup_value, not_found};
use crate::resources::common::{
    call, client_error, configure_provider_data, not_configured, state_of, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct FieldConfigurationDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl FieldConfigurationDataSource {
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

        match call(ctx, client.field_configurations().get(&id)).await {
            Ok(Some(found)) => Ok(field_configuration_state(found)),
            Ok(None) => Err(not_found("field configuration", &id)),
            Err(e) => Err(client_error("read", "field configuration", &e)),
        }
    }
}

fn field_configuration_state(configuration: FieldConfiguration) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(configuration.id.to_string())),
        ("name", Dynamic::String(configuration.name)),
        (
            "description",
            Dynamic::String(configuration.description.unwrap_or_default()),
        ),
        ("is_default", Dynamic::Bool(configuration.is_default)),
    ])
}

#[async_trait]
impl DataSource for FieldConfigurationDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_field_configuration"
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
            .description("Jira Issue Field Configuration Data Source")
            .attribute(lookup_attribute("id", "The ID of the field configuration."))
            .attribute(computed_attribute(
                "name",
                AttributeType::String,
                "The name of the field configuration.",
            ))
            .attribute(computed_attribute(
                "description",
                AttributeType::String,
                "The description of the field configuration.",
            ))
            .attribute(computed_attribute(
                "is_default",
                AttributeType::Bool,
                "Whether the field configuration is the default.",
            ))
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
impl DataSourceWithConfigure for FieldConfigurationDataSource {
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
