//! Permission grant resource implementation
//!
//! Grants cannot be edited in Jira; every configurable attribute replaces the grant.

use async_trait::async_trait;
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
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::StringValues;

use crate::api::permission_schemes::{PermissionGrant, PermissionGrantRequest, PermissionHolder};
use crate::api::Client;
use crate::resources::common::{
    call, carry_unknown, client_error, configure_provider_data, id_attribute, non_empty,
    not_configured, parse_import_id, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

pub const HOLDER_TYPES: &[&str] = &[
    "anyone",
    "applicationRole",
    "assignee",
    "group",
    "groupCustomField",
    "projectLead",
    "projectRole",
    "reporter",
    "sd.customer.portal.only",
    "user",
    "userCustomField",
];

/// Holder types that name a specific group, role, user or field
const PARAMETERIZED_HOLDERS: &[&str] = &["group", "projectRole", "user", "userCustomField"];

pub const BUILT_IN_PERMISSIONS: &[&str] = &[
    "ADMINISTER_PROJECTS",
    "BROWSE_PROJECTS",
    "MANAGE_SPRINTS_PERMISSION",
    "SERVICEDESK_AGENT",
    "VIEW_DEV_TOOLS",
    "VIEW_READONLY_WORKFLOW",
    "ASSIGNABLE_USER",
    "ASSIGN_ISSUES",
    "CLOSE_ISSUES",
    "CREATE_ISSUES",
    "DELETE_ISSUES",
    "EDIT_ISSUES",
    "LINK_ISSUES",
    "MODIFY_REPORTER",
    "MOVE_ISSUES",
    "RESOLVE_ISSUES",
    "SCHEDULE_ISSUES",
    "SET_ISSUE_SECURITY",
    "TRANSITION_ISSUES",
    "MANAGE_WATCHERS",
    "VIEW_VOTERS_AND_WATCHERS",
    "ADD_COMMENTS",
    "DELETE_ALL_COMMENTS",
    "DELETE_OWN_COMMENTS",
    "EDIT_ALL_COMMENTS",
    "EDIT_OWN_COMMENTS",
    "CREATE_ATTACHMENTS",
    "DELETE_ALL_ATTACHMENTS",
    "DELETE_OWN_ATTACHMENTS",
    "DELETE_ALL_WORKLOGS",
    "DELETE_OWN_WORKLOGS",
    "EDIT_ALL_WORKLOGS",
    "EDIT_OWN_WORKLOGS",
    "WORK_ON_ISSUES",
];

#[derive(Default)]
pub struct PermissionGrantResource {
    provider_data: Option<AtlassianProviderData>,
}

impl PermissionGrantResource {
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

fn holder_path(name: &str) -> AttributePath {
    AttributePath::new("holder").attribute(name)
}

fn holder_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("type", AttributeType::String)
            .description("The type of permission holder. Changing it replaces the grant.")
            .required()
            .validator(StringValues::new(HOLDER_TYPES))
            .plan_modifier(RequiresReplace::create())
            .build(),
        AttributeBuilder::new("parameter", AttributeType::String)
            .description("The identifier associated with the holder type: a group name, project role ID, account ID or custom field ID. Required for group, projectRole, user and userCustomField holders. Changing it replaces the grant.")
            .optional()
            .plan_modifier(RequiresReplace::create())
            .build(),
    ]
}

fn holder_from(value: &DynamicValue) -> Option<PermissionHolder> {
    Some(PermissionHolder {
        holder_type: value.get_string(&holder_path("type")).ok()?,
        parameter: non_empty(value.get_string(&holder_path("parameter")).ok()),
    })
}

/// Fails when a parameterized holder type comes without its parameter
fn check_holder(value: &DynamicValue) -> Result<(), Diagnostic> {
    let unknown = |name: &str| value.get(&holder_path(name)).is_ok_and(Dynamic::is_unknown);
    if unknown("type") || unknown("parameter") {
        return Ok(());
    }
    let Some(holder) = holder_from(value) else {
        return Ok(());
    };
    if PARAMETERIZED_HOLDERS.contains(&holder.holder_type.as_str()) && holder.parameter.is_none() {
        return Err(Diagnostic::error(
            "Missing Holder Parameter",
            format!(
                "A holder of type {:?} requires 'parameter' to be set",
                holder.holder_type
            ),
        )
        .with_attribute(holder_path("parameter")));
    }
    Ok(())
}

fn grant_state(scheme_id: &str, grant: PermissionGrant) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(grant.id.to_string())),
        ("permission_scheme_id", Dynamic::from(scheme_id)),
        (
            "holder",
            Dynamic::object([
                ("type", Dynamic::String(grant.holder.holder_type)),
                ("parameter", Dynamic::string_or_null(grant.holder.parameter)),
            ]),
        ),
        ("permission", Dynamic::String(grant.permission)),
    ])
}

#[async_trait]
impl Resource for PermissionGrantResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_permission_grant"
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
            .description("Jira Permission Grant Resource")
            .attribute(id_attribute("The ID of the permission grant."))
            .attribute(
                AttributeBuilder::new("permission_scheme_id", AttributeType::String)
                    .description("The ID of the permission scheme the grant belongs to. Changing it replaces the grant.")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::single_nested("holder", holder_attributes())
                    .description("The user, group, field or role being granted the permission.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("permission", AttributeType::String)
                    .description("The built-in permission being granted. Changing it replaces the grant.")
                    .required()
                    .validator(StringValues::new(BUILT_IN_PERMISSIONS))
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
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: check_holder(&request.config).err().into_iter().collect(),
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

        let plan = &request.planned_state;
        if let Err(diag) = check_holder(plan) {
            diagnostics.push(diag);
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        }

        let (Some(scheme_id), Some(holder), Some(permission)) = (
            string_attr(plan, "permission_scheme_id"),
            holder_from(plan),
            string_attr(plan, "permission"),
        ) else {
            diagnostics.push(Diagnostic::error(
                "Missing permission grant",
                "'permission_scheme_id', 'holder.type' and 'permission' are required",
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        };

        let grant_request = PermissionGrantRequest { holder, permission };
        match call(
            &ctx,
            client
                .permission_schemes()
                .create_grant(&scheme_id, &grant_request),
        )
        .await
        {
            Ok(grant) => {
                tracing::info!(
                    "Granted {} in permission scheme {} ({})",
                    grant.permission,
                    scheme_id,
                    grant.id
                );
                CreateResourceResponse {
                    new_state: grant_state(&scheme_id, grant),
                    private: vec![],
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("create", "permission grant", &e));
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

        let (Some(id), Some(scheme_id)) = (
            string_attr(&request.current_state, "id"),
            string_attr(&request.current_state, "permission_scheme_id"),
        ) else {
            return ReadResourceResponse {
                new_state: None,
                diagnostics,
                private: request.private,
            };
        };

        match call(&ctx, client.permission_schemes().get_grant(&scheme_id, &id)).await {
            Ok(grant) => ReadResourceResponse {
                new_state: Some(grant_state(&scheme_id, grant)),
                diagnostics,
                private: request.private,
            },
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "Permission grant {} of scheme {} no longer exists, removing from state",
                    id,
                    scheme_id
                );
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("read", "permission grant", &e));
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

        let (Some(id), Some(scheme_id)) = (
            string_attr(&request.prior_state, "id"),
            string_attr(&request.prior_state, "permission_scheme_id"),
        ) else {
            return DeleteResourceResponse { diagnostics };
        };

        match call(
            &ctx,
            client.permission_schemes().delete_grant(&scheme_id, &id),
        )
        .await
        {
            Ok(()) => tracing::info!("Deleted permission grant {} of scheme {}", id, scheme_id),
            Err(e) => diagnostics.push(client_error("delete", "permission grant", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for PermissionGrantResource {
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
impl ResourceWithImportState for PermissionGrantResource {
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };

        match parse_import_id(&request.id, &["grant_id", "permission_scheme_id"]) {
            Ok(parts) => {
                let attributes = vec![
                    (AttributePath::new("id"), parts[0].clone()),
                    (AttributePath::new("permission_scheme_id"), parts[1].clone()),
                ];
                import_state_attributes(attributes, &request, &mut response);
            }
            Err(diag) => response.diagnostics.push(diag),
        }

        response
    }
}

#[cfg(test)]
#[path = "./resource_permission_grant_test.rs"]
mod resource_permission_grant_test;
