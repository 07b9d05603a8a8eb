//! Current account data source implementation

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

use crate::api::system::Myself;
use crate::api::Client;
use crate::data_sources::computed_attribute;
use crate::resources::common::{
    call, client_error, configure_provider_data, not_configured, state_of, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct MyselfDataSource {
    provider_data: Option<AtlassianProviderData>,
}

impl MyselfDataSource {
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

fn myself_state(me: Myself) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(me.account_id.clone())),
        ("account_id", Dynamic::String(me.account_id)),
        ("account_type", Dynamic::String(me.account_type)),
        ("active", Dynamic::Bool(me.active)),
        ("display_name", Dynamic::String(me.display_name)),
        ("email_address", Dynamic::string_or_null(me.email_address)),
        ("locale", Dynamic::string_or_null(me.locale)),
        ("time_zone", Dynamic::string_or_null(me.time_zone)),
    ])
}

#[async_trait]
impl DataSource for MyselfDataSource {
    fn type_name(&self) -> &str {
        "atlassian_jira_myself"
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
        let string = |name: &str, description: &str| {
            computed_attribute(name, AttributeType::String, description)
        };
        let schema = SchemaBuilder::new()
            .version(0)
            .description("The Jira account the provider authenticates as")
            .attribute(string("id", "Same as account_id."))
            .attribute(string("account_id", "The account ID of the user."))
            .attribute(string(
                "account_type",
                "The user account type: atlassian, app or customer.",
            ))
            .attribute(computed_attribute(
                "active",
                AttributeType::Bool,
                "Whether the user is active.",
            ))
            .attribute(string("display_name", "The display name of the user."))
            .attribute(string(
                "email_address",
                "The email address of the user, subject to privacy settings.",
            ))
            .attribute(string("locale", "The locale of the user."))
            .attribute(string("time_zone", "The time zone of the user."))
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
        let result = match self.client() {
            Ok(client) => call(&ctx, client.system().myself())
                .await
                .map(myself_state)
                .map_err(|e| client_error("read", "current user", &e)),
            Err(diag) => Err(diag),
        };

        match result {
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
impl DataSourceWithConfigure for MyselfDataSource {
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
