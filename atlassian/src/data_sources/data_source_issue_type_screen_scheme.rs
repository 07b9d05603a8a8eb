//! Issue type screen scheme data source implementation

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
use crate::resources::issues::resource_issue_type_screen_scheme::{
    mapping_attributes, scheme_mappings, scheme_state,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct IssueTypeScreenSchemeDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl IssueTypeScreenSchemeDataSource {
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

        let scheme = call(ctx, client.issue_type_screen_schemes().get(&id))
            .await
            .map_err(|e| client_error("read", "issue type screen scheme", &e))?
            .ok_or_else(|| not_found("issue type screen scheme", &id))?;
        let mappings = scheme_mappings(ctx, client, &id)
            .await
            .map_err(|e| client_error("read", "issue type screen scheme mappings", &e))?;

        Ok(scheme_state(scheme, mappings))
    }
}

#[async_trait]
impl DataSource for IssueTypeScreenSchemeDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_type_screen_scheme"
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
            .description("Jira Issue Type Screen Scheme Data Source")
            .attribute(lookup_attribute("id", "The ID of the issue type screen scheme."))
            .attribute(computed_attribute(
                "name",
                AttributeType::String,
                "The name of the issue type screen scheme.",
            ))
            .attribute(computed_attribute(
                "description",
                AttributeType::String,
                "The description of the issue type screen scheme.",
            ))
            .attribute(
                AttributeBuilder::list_nested("issue_type_mappings", read_only(mapping_attributes()))
                    .description("The issue type to screen scheme mappings.")
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
impl DataSourceWithConfigure for IssueTypeScreenSchemeDataSource {
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
