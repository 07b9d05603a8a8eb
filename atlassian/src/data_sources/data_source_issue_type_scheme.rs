//! Issue type scheme data source implementation

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

use crate::api::issue_type_schemes::IssueTypeScheme;
use crate::api::Client;
use crate::data_sources::{computed_attribute, lookup_attribute, lookup_value, not_found};
use crate::resources::common::{
    call, client_error, configure_provider_data, not_configured, state_of, HandlerKind,
};
use crate::resources::issues::resource_issue_type_scheme::scheme_issue_type_ids;
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct IssueTypeSchemeDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl IssueTypeSchemeDataSource {
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

        let scheme = call(ctx, client.issue_type_schemes().get(&id))
            .await
            .map_err(|e| client_error("read", "issue type scheme", &e))?
            .ok_or_else(|| not_found("issue type scheme", &id))?;
        let issue_type_ids = scheme_issue_type_ids(ctx, client, &id)
            .await
            .map_err(|e| client_error("read", "issue type scheme items", &e))?;

        Ok(scheme_state(scheme, issue_type_ids))
    }
}

fn scheme_state(scheme: IssueTypeScheme, issue_type_ids: Vec<String>) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(scheme.id)),
        ("name", Dynamic::String(scheme.name)),
        (
            "description",
            Dynamic::String(scheme.description.unwrap_or_default()),
        ),
        (
            "default_issue_type_id",
            Dynamic::string_or_null(scheme.default_issue_type_id),
        ),
        ("is_default", Dynamic::Bool(scheme.is_default)),
        (
            "issue_type_ids",
            Dynamic::List(issue_type_ids.into_iter().map(Dynamic::String).collect()),
        ),
    ])
}

#[async_trait]
impl DataSource for IssueTypeSchemeDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_type_scheme"
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
            .description("Jira Issue Type Scheme Data Source")
            .attribute(lookup_attribute("id", "The ID of the issue type scheme."))
            .attribute(computed_attribute(
                "name",
                AttributeType::String,
                "The name of the issue type scheme.",
            ))
            .attribute(computed_attribute(
                "description",
                AttributeType::String,
                "The description of the issue type scheme.",
            ))
            .attribute(computed_attribute(
                "default_issue_type_id",
                AttributeType::String,
                "The ID of the default issue type of the issue type scheme.",
            ))
            .attribute(computed_attribute(
                "is_default",
                AttributeType::Bool,
                "Whether the issue type scheme is the default.",
            ))
            .attribute(computed_attribute(
                "issue_type_ids",
                AttributeType::List(Box::new(AttributeType::String)),
                "The IDs of the issue types in the issue type scheme.",
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
impl DataSourceWithConfigure for IssueTypeSchemeDataSource {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::common::{bool_attr, string_list_attr};
    use crate::resources::test_helpers::configured_data_source;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_read_lists_issue_types() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/rest/api/3/issuetypescheme")
            .match_query(Matcher::UrlEncoded("id".into(), "10000".into()))
            .with_body(
                r#"{"isLast":true,"values":[{"id":"10000","name":"Default Issue Type Scheme","isDefault":true}]}"#,
            )
            .create_async()
            .await;
        let _mapping = server
            .mock("GET", "/rest/api/3/issuetypescheme/mapping")
            .match_query(Matcher::UrlEncoded("issueTypeSchemeId".into(), "10000".into()))
            .with_body(
                r#"{"isLast":true,"values":[
                    {"issueTypeSchemeId":"10000","issueTypeId":"10001"},
                    {"issueTypeSchemeId":"10000","issueTypeId":"10002"}
                ]}"#,
            )
            .create_async()
            .await;

        let data_source: IssueTypeSchemeDataSource = configured_data_source(&server.url()).await;
        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "atlassian_jira_issue_type_scheme".to_string(),
                    config: state_of([("id", Dynamic::from("10000"))]),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(bool_attr(&response.state, "is_default"), Some(true));
        assert_eq!(
            string_list_attr(&response.state, "issue_type_ids"),
            vec!["10001", "10002"]
        );
    }
}
