//! Issue type data source implementation

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

use crate::api::issue_types::IssueType;
use crate::api::Client;
use crate::data_sources::{computed_attribute, lookup_attribute, lookup_value, not_found};
use crate::resources::common::{
    call, client_error, configure_provider_data, not_configured, state_of, HandlerKind,
};
use crate::resources::issues::resource_issue_type::type_for_level;
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct IssueTypeDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl IssueTypeDataSource {
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

        match call(ctx, client.issue_types().get(&id)).await {
            Ok(issue_type) => Ok(issue_type_state(issue_type)),
            Err(e) if e.is_not_found() => Err(not_found("issue type", &id)),
            Err(e) => Err(client_error("read", "issue type", &e)),
        }
    }
}

fn issue_type_state(issue_type: IssueType) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(issue_type.id)),
        ("name", Dynamic::String(issue_type.name)),
        ("description", Dynamic::String(issue_type.description)),
        ("hierarchy_level", Dynamic::from(issue_type.hierarchy_level)),
        (
            "type",
            Dynamic::from(type_for_level(issue_type.hierarchy_level)),
        ),
        (
            "avatar_id",
            issue_type.avatar_id.map(Dynamic::from).unwrap_or(Dynamic::Null),
        ),
        ("icon_url", Dynamic::string_or_null(issue_type.icon_url)),
        ("subtask", Dynamic::Bool(issue_type.subtask)),
    ])
}

#[async_trait]
impl DataSource for IssueTypeDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_type"
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
            .description("Jira Issue Type Data Source")
            .attribute(lookup_attribute("id", "The ID of the issue type."))
            .attribute(computed_attribute(
                "name",
                AttributeType::String,
                "The name of the issue type.",
            ))
            .attribute(computed_attribute(
                "description",
                AttributeType::String,
                "The description of the issue type.",
            ))
            .attribute(computed_attribute(
                "hierarchy_level",
                AttributeType::Number,
                "The hierarchy level of the issue type: 0 for standard, -1 for sub-task.",
            ))
            .attribute(computed_attribute(
                "type",
                AttributeType::String,
                "Deprecated. The type of the issue type: standard or sub-task.",
            ))
            .attribute(computed_attribute(
                "avatar_id",
                AttributeType::Number,
                "The ID of the issue type's avatar.",
            ))
            .attribute(computed_attribute(
                "icon_url",
                AttributeType::String,
                "The URL of the issue type's avatar.",
            ))
            .attribute(computed_attribute(
                "subtask",
                AttributeType::Bool,
                "Whether this issue type is used to create sub-tasks.",
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
impl DataSourceWithConfigure for IssueTypeDataSource {
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
