//! Group membership resource implementation

use async_trait::async_trait;
use futures::TryStreamExt;
use tfplug::context::Context;
use tfplug::import::import_state_attributes;
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
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic};

use crate::api::{ApiError, Client};
use crate::resources::common::{
    call, carry_unknown, client_error, composite_id, configure_provider_data, id_attribute,
    not_configured, parse_import_id, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct GroupUserResource {
    provider_data: Option<AtlassianProviderData>,
}

impl GroupUserResource {
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

/// Walks member pages until `account_id` shows up
async fn is_member(
    ctx: &Context,
    client: &Client,
    group_name: &str,
    account_id: &str,
) -> Result<bool, ApiError> {
    let search = async {
        let mut pages = std::pin::pin!(client.groups().members_by_name(group_name));
        while let Some(page) = pages.try_next().await? {
            if page.iter().any(|m| m.account_id == account_id) {
                return Ok(true);
            }
        }
        Ok::<bool, ApiError>(false)
    };
    call(ctx, search).await
}

#[async_trait]
impl Resource for GroupUserResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_group_user"
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
            .description("Jira Group User Resource")
            .attribute(id_attribute(
                "The ID of the membership, the group name and account ID joined with a hyphen.",
            ))
            .attribute(
                AttributeBuilder::new("group_name", AttributeType::String)
                    .description("Name of the group. Changing it replaces the membership.")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("account_id", AttributeType::String)
                    .description("The account ID of the user. Changing it replaces the membership.")
                    .required()
                    .plan_modifier(RequiresReplace::create())
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

        let (Some(group_name), Some(account_id)) = (
            string_attr(&request.planned_state, "group_name"),
            string_attr(&request.planned_state, "account_id"),
        ) else {
            diagnostics.push(Diagnostic::error(
                "Missing membership",
                "Both 'group_name' and 'account_id' are required",
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        };

        if let Err(e) = call(&ctx, client.groups().add_user(&group_name, &account_id)).await {
            diagnostics.push(client_error("add user to", "group", &e));
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        }
        tracing::info!("Added {} to group {}", account_id, group_name);

        CreateResourceResponse {
            new_state: state_of([
                ("id", Dynamic::String(composite_id(&[group_name.as_str(), account_id.as_str()]))),
                ("group_name", Dynamic::String(group_name)),
                ("account_id", Dynamic::String(account_id)),
            ]),
            private: vec![],
            diagnostics,
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

        let (Some(group_name), Some(account_id)) = (
            string_attr(&request.current_state, "group_name"),
            string_attr(&request.current_state, "account_id"),
        ) else {
            return ReadResourceResponse {
                new_state: None,
                diagnostics,
                private: request.private,
            };
        };

        match is_member(&ctx, client, &group_name, &account_id).await {
            Ok(true) => ReadResourceResponse {
                new_state: Some(state_of([
                    ("id", Dynamic::String(composite_id(&[group_name.as_str(), account_id.as_str()]))),
                    ("group_name", Dynamic::String(group_name)),
                    ("account_id", Dynamic::String(account_id)),
                ])),
                diagnostics,
                private: request.private,
            },
            Ok(false) => {
                tracing::warn!(
                    "{} is no longer a member of {}, removing from state",
                    account_id,
                    group_name
                );
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) if e.is_not_found() => ReadResourceResponse {
                new_state: None,
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

        let (Some(group_name), Some(account_id)) = (
            string_attr(&request.prior_state, "group_name"),
            string_attr(&request.prior_state, "account_id"),
        ) else {
            return DeleteResourceResponse { diagnostics };
        };

        match call(&ctx, client.groups().remove_user(&group_name, &account_id)).await {
            Ok(()) => tracing::info!("Removed {} from group {}", account_id, group_name),
            Err(e) => diagnostics.push(client_error("remove user from", "group", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for GroupUserResource {
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
impl ResourceWithImportState for GroupUserResource {
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };

        match parse_import_id(&request.id, &["group_name", "account_id"]) {
            Ok(parts) => {
                let id = composite_id(&parts);
                import_state_attributes(
                    vec![
                        (AttributePath::new("id"), id),
                        (AttributePath::new("group_name"), parts[0].clone()),
                        (AttributePath::new("account_id"), parts[1].clone()),
                    ],
                    &request,
                    &mut response,
                );
            }
            Err(diag) => response.diagnostics.push(diag),
        }

        response
    }
}

#[cfg(test)]
#[path = "./resource_group_user_test.rs"]
mod resource_group_user_test;
