//! Workflow status resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::{DefaultValue, RequiresReplace};
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
use tfplug::validator::{StringLengthBetween, StringValues};

use crate::api::statuses::{ProjectRef, Status, StatusCreate, StatusScope, StatusUpdate};
use crate::api::Client;
use crate::resources::common::{
    call, client_error, configure_provider_data, id_attribute, name_attribute, not_configured,
    state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

pub const STATUS_CATEGORIES: &[&str] = &["TODO", "IN_PROGRESS", "DONE"];
pub const SCOPE_GLOBAL: &str = "GLOBAL";
pub const SCOPE_PROJECT: &str = "PROJECT";

/// Jira rejects empty status descriptions
pub const DEFAULT_DESCRIPTION: &str = " ";

#[derive(Default)]
pub struct StatusResource {
    provider_data: Option<AtlassianProviderData>,
}

impl StatusResource {
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

fn scope_path(name: &str) -> AttributePath {
    AttributePath::new("status_scope").attribute(name)
}

pub(crate) fn scope_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("type", AttributeType::String)
            .description("The scope of the status: GLOBAL for company-managed projects or PROJECT for a single team-managed project. Changing it replaces the status.")
            .required()
            .validator(StringValues::new(&[SCOPE_GLOBAL, SCOPE_PROJECT]))
            .plan_modifier(RequiresReplace::create())
            .build(),
        AttributeBuilder::new("id", AttributeType::String)
            .description("The ID of the project the status belongs to. Required for PROJECT scope and forbidden for GLOBAL scope. Changing it replaces the status.")
            .optional()
            .computed()
            .plan_modifier(DefaultValue::string(""))
            .plan_modifier(RequiresReplace::create())
            .build(),
    ]
}

/// GLOBAL statuses carry no project, PROJECT statuses need one
fn check_scope(value: &DynamicValue) -> Result<(), Diagnostic> {
    let Ok(scope_type) = value.get_string(&scope_path("type")) else {
        return Ok(());
    };
    let project_id = match value.get(&scope_path("id")) {
        Ok(Dynamic::Unknown) => return Ok(()),
        Ok(Dynamic::String(id)) => id.as_str(),
        _ => "",
    };

    match scope_type.as_str() {
        SCOPE_GLOBAL if !project_id.is_empty() => Err(Diagnostic::error(
            "Invalid Status Scope",
            "A GLOBAL status cannot belong to a project, remove 'status_scope.id'",
        )
        .with_attribute(scope_path("id"))),
        SCOPE_PROJECT if project_id.is_empty() => Err(Diagnostic::error(
            "Invalid Status Scope",
            "A PROJECT status requires the project ID in 'status_scope.id'",
        )
        .with_attribute(scope_path("id"))),
        _ => Ok(()),
    }
}

fn scope_from(value: &DynamicValue) -> Option<StatusScope> {
    let scope_type = value.get_string(&scope_path("type")).ok()?;
    let project = value
        .get_string(&scope_path("id"))
        .ok()
        .filter(|id| !id.is_empty())
        .map(|id| ProjectRef { id });
    Some(StatusScope {
        scope_type,
        project,
    })
}

pub(crate) fn scope_value(scope: &StatusScope) -> Dynamic {
    Dynamic::object([
        ("type", Dynamic::String(scope.scope_type.clone())),
        ("id", Dynamic::String(scope.project_id())),
    ])
}

pub(crate) fn status_state(status: Status) -> DynamicValue {
    let scope = scope_value(&status.scope);
    state_of([
        ("id", Dynamic::String(status.id)),
        ("name", Dynamic::String(status.name)),
        (
            "description",
            Dynamic::String(
                status
                    .description
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            ),
        ),
        ("status_category", Dynamic::String(status.status_category)),
        ("status_scope", scope),
    ])
}

#[async_trait]
impl Resource for StatusResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_status"
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
            .description("Jira Workflow Status Resource")
            .attribute(id_attribute("The ID of the status."))
            .attribute(name_attribute("The name of the status.", 255))
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .description("The description of the status. Defaults to a single space because Jira rejects empty descriptions.")
                    .optional()
                    .computed()
                    .validator(StringLengthBetween::new(1, 255))
                    .plan_modifier(DefaultValue::string(DEFAULT_DESCRIPTION))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("status_category", AttributeType::String)
                    .description("The category of the status: TODO, IN_PROGRESS or DONE.")
                    .required()
                    .validator(StringValues::new(STATUS_CATEGORIES))
                    .build(),
            )
            .attribute(
                AttributeBuilder::single_nested("status_scope", scope_attributes())
                    .description("The scope of the status.")
                    .required()
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
            diagnostics: check_scope(&request.config).err().into_iter().collect(),
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
        if let Err(diag) = check_scope(plan) {
            diagnostics.push(diag);
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        }

        let Some(scope) = scope_from(plan) else {
            diagnostics.push(
                Diagnostic::error("Missing status scope", "'status_scope.type' is required")
                    .with_attribute(scope_path("type")),
            );
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        };

        let status = StatusCreate {
            name: string_attr(plan, "name").unwrap_or_default(),
            status_category: string_attr(plan, "status_category").unwrap_or_default(),
            description: string_attr(plan, "description"),
        };

        let created = match call(&ctx, client.statuses().create(&scope, &[status])).await {
            Ok(created) => created,
            Err(e) => {
                diagnostics.push(client_error("create", "status", &e));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        match created.into_iter().next() {
            Some(status) => {
                tracing::info!("Created status {} ({})", status.name, status.id);
                CreateResourceResponse {
                    new_state: status_state(status),
                    private: vec![],
                    diagnostics,
                }
            }
            None => {
                diagnostics.push(Diagnostic::error(
                    "Status not created",
                    "Jira accepted the request but returned no status",
                ));
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

        let Some(id) = string_attr(&request.current_state, "id") else {
            return ReadResourceResponse {
                new_state: None,
                diagnostics,
                private: request.private,
            };
        };

        match call(&ctx, client.statuses().get(&id)).await {
            Ok(Some(status)) => ReadResourceResponse {
                new_state: Some(status_state(status)),
                diagnostics,
                private: request.private,
            },
            Ok(None) => {
                tracing::warn!("Status {} no longer exists, removing from state", id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("read", "status", &e));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                }
            }
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let Some(id) = string_attr(&request.prior_state, "id") else {
            diagnostics.push(Diagnostic::error(
                "Missing ID",
                "Status ID is required for update",
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        };

        let plan = &request.planned_state;
        let update = StatusUpdate {
            id: id.clone(),
            name: string_attr(plan, "name").unwrap_or_default(),
            status_category: string_attr(plan, "status_category").unwrap_or_default(),
            description: string_attr(plan, "description"),
        };

        if let Err(e) = call(&ctx, client.statuses().update(&[update])).await {
            diagnostics.push(client_error("update", "status", &e));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        }

        let mut new_state = request.planned_state;
        if let Err(e) = new_state.set_string(&AttributePath::new("id"), id) {
            diagnostics.push(Diagnostic::error("Failed to set id", e.to_string()));
        }

        UpdateResourceResponse {
            new_state,
            private: vec![],
            diagnostics,
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

        match call(&ctx, client.statuses().delete(&id)).await {
            Ok(()) => tracing::info!("Deleted status {}", id),
            Err(e) => diagnostics.push(client_error("delete", "status", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for StatusResource {
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
impl ResourceWithImportState for StatusResource {
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(AttributePath::new("id"), &request, &mut response);
        response
    }
}

#[cfg(test)]
#[path = "./resource_status_test.rs"]
mod resource_status_test;
