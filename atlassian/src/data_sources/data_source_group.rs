//! Group data source implementation

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
use crate::resources::groups::resource_group::{group_members, group_state, user_attributes};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct GroupDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl GroupDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(|data| data.client.as_ref())
            .ok_or_else(not_configured)
    }
}

#[async_trait]
impl DataSource for GroupDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_group"
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
            .description("Jira Group Data Source")
            .attribute(computed_attribute(
                "id",
                AttributeType::String,
                "The ID of the group.",
            ))
            .attribute(lookup_attribute("name", "The name of the group."))
            .attribute(computed_attribute(
                "self",
                AttributeType::String,
                "The URL for these group details.",
            ))
            .attribute(
                AttributeBuilder::list_nested("users", read_only(user_attributes()))
                    .description("The users in the group, including inactive ones.")
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
        let mut diagnostics = vec![];

        let (client, name) = match (self.client(), lookup_value(&request.config, "name")) {
            (Ok(client), Ok(name)) => (client, name),
            (Err(diag), _) | (_, Err(diag)) => {
                diagnostics.push(diag);
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                };
            }
        };

        let group = match call(&ctx, client.groups().find_by_name(&name)).await {
            Ok(Some(group)) => group,
            Ok(None) => {
                diagnostics.push(not_found("group", &name));
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                };
            }
            Err(e) => {
                diagnostics.push(client_error("read", "group", &e));
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                };
            }
        };

        match group_members(&ctx, client, &group.group_id).await {
            Ok(members) => ReadDataSourceResponse {
                state: group_state(client, group, members),
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(client_error("read", "group members", &e));
                ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                }
            }
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for GroupDataSource {
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
