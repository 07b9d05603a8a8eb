//! Group resource implementation

use async_trait::async_trait;
use futures::TryStreamExt;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::RequiresReplace;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::groups::{Group, GroupMember};
use crate::api::{ApiError, Client};
use crate::resources::common::{
    call, carry_unknown, client_error, configure_provider_data, id_attribute, not_configured,
    self_attribute, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct GroupResource {
    provider_data: Option<AtlassianProviderData>,
}

impl GroupResource {
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

/// Nested attributes of one `users` element
pub(crate) fn user_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("account_id", AttributeType::String)
            .description("The account ID of the user, which uniquely identifies the user across all Atlassian products.")
            .computed()
            .build(),
        AttributeBuilder::new("account_type", AttributeType::String)
            .description("The user account type: atlassian, app or customer.")
            .computed()
            .build(),
        AttributeBuilder::new("active", AttributeType::Bool)
            .description("Whether the user is active.")
            .computed()
            .build(),
        AttributeBuilder::new("display_name", AttributeType::String)
            .description("The display name of the user.")
            .computed()
            .build(),
    ]
}

pub(crate) fn users_value(members: Vec<GroupMember>) -> Dynamic {
    Dynamic::List(
        members
            .into_iter()
            .map(|m| {
                Dynamic::object([
                    ("account_id", Dynamic::String(m.account_id)),
                    ("account_type", Dynamic::String(m.account_type)),
                    ("active", Dynamic::Bool(m.active)),
                    ("display_name", Dynamic::String(m.display_name)),
                ])
            })
            .collect(),
    )
}

/// `self` as exposed in state, built from the group id rather than the bulk listing
pub(crate) fn group_self_url(client: &Client, group_id: &str) -> String {
    format!("{}/group?groupId={}", client.base_url(), group_id)
}

/// Collects every member page of a group
pub(crate) async fn group_members(
    ctx: &Context,
    client: &Client,
    group_id: &str,
) -> Result<Vec<GroupMember>, ApiError> {
    let pages = client.groups().members(group_id);
    call(ctx, pages.try_concat()).await
}

pub(crate) fn group_state(client: &Client, group: Group, members: Vec<GroupMember>) -> DynamicValue {
    let self_url = group_self_url(client, &group.group_id);
    state_of([
        ("id", Dynamic::String(group.group_id)),
        ("name", Dynamic::String(group.name)),
        ("self", Dynamic::String(self_url)),
        ("users", users_value(members)),
    ])
}

#[async_trait]
impl Resource for GroupResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_group"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Jira Group Resource")
            .attribute(id_attribute("The ID of the group."))
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The name of the group. Changing it replaces the group.")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(self_attribute("The URL for these group details."))
            .attribute(
                AttributeBuilder::list_nested("users", user_attributes())
                    .description("The users in the group, including inactive ones.")
                    .computed()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let Some(name) = string_attr(&request.planned_state, "name") else {
            diagnostics.push(
                Diagnostic::error("Missing name", "The 'name' attribute is required")
                    .with_attribute(AttributePath::new("name")),
            );
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        };

        let group = match call(&ctx, client.groups().create(&name)).await {
            Ok(group) => group,
            Err(e) => {
                diagnostics.push(client_error("create", "group", &e));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };
        tracing::info!("Created group {} ({})", group.name, group.group_id);

        match group_members(&ctx, client, &group.group_id).await {
            Ok(members) => CreateResourceResponse {
                new_state: group_state(client, group, members),
                private: vec![],
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(client_error("read", "group members", &e));
                CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                }
            }
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        // Imported state only carries the name
        let lookup = match string_attr(&request.current_state, "name") {
            Some(name) => call(&ctx, client.groups().find_by_name(&name)).await,
            None => Ok(None),
        };

        let group = match lookup {
            Ok(Some(group)) => group,
            Ok(None) => {
                tracing::warn!("Group no longer exists, removing from state");
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                };
            }
            Err(e) => {
                diagnostics.push(client_error("read", "group", &e));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        match group_members(&ctx, client, &group.group_id).await {
            Ok(members) => ReadResourceResponse {
                new_state: Some(group_state(client, group, members)),
                diagnostics,
                private: request.private,
            },
            Err(e) => {
                diagnostics.push(client_error("read", "group members", &e));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                }
            }
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        // Every configurable attribute forces replacement
        UpdateResourceResponse {
            new_state: carry_unknown(&request.planned_state, &request.prior_state),
            private: vec![],
            diagnostics: vec![],
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let Some(id) = string_attr(&request.prior_state, "id") else {
            return DeleteResourceResponse { diagnostics };
        };

        match call(&ctx, client.groups().delete(&id)).await {
            Ok(()) => tracing::info!("Deleted group {}", id),
            Err(e) => diagnostics.push(client_error("delete", "group", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for GroupResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let (provider_data, diagnostics) =
            configure_provider_data(request.provider_data, HandlerKind::Resource);
        self.provider_data = provider_data;
        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for GroupResource {
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(AttributePath::new("name"), &request, &mut response);
        response
    }
}

#[cfg(test)]
#[path = "./resource_group_test.rs"]
mod resource_group_test;
