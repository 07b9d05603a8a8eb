//! Issue type resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
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
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{IntValues, StringValues};

use crate::api::issue_types::{CreateIssueTypeRequest, IssueType, UpdateIssueTypeRequest};
use crate::api::Client;
use crate::resources::common::{
    call, client_error, configure_provider_data, description_attribute, id_attribute, int_attr,
    name_attribute, non_empty, not_configured, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

pub const TYPE_STANDARD: &str = "standard";
pub const TYPE_SUBTASK: &str = "sub-task";

const LEVEL_STANDARD: i64 = 0;
const LEVEL_SUBTASK: i64 = -1;

#[derive(Default)]
pub struct IssueTypeResource {
    provider_data: Option<AtlassianProviderData>,
}

impl IssueTypeResource {
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

/// Deprecated `type` value for a hierarchy level
pub(crate) fn type_for_level(level: i64) -> &'static str {
    if level == LEVEL_SUBTASK {
        TYPE_SUBTASK
    } else {
        TYPE_STANDARD
    }
}

fn level_for_type(issue_type: &str) -> i64 {
    if issue_type == TYPE_SUBTASK {
        LEVEL_SUBTASK
    } else {
        LEVEL_STANDARD
    }
}

/// Settles `type` and `hierarchy_level` into one hierarchy level
///
/// Either may be configured, not both. Nothing configured means a standard issue type.
fn hierarchy_level(value: &DynamicValue) -> Result<i64, Diagnostic> {
    match (string_attr(value, "type"), int_attr(value, "hierarchy_level")) {
        (Some(_), Some(_)) => Err(Diagnostic::error(
            "Invalid Attribute Combination",
            "Only one of 'type' and 'hierarchy_level' may be set. 'type' is deprecated, use 'hierarchy_level' instead.",
        )
        .with_attribute(AttributePath::new("type"))),
        (Some(issue_type), None) => Ok(level_for_type(&issue_type)),
        (None, Some(level)) => Ok(level),
        (None, None) => Ok(LEVEL_STANDARD),
    }
}

fn issue_type_state(issue_type: IssueType) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(issue_type.id)),
        ("name", Dynamic::String(issue_type.name)),
        ("description", Dynamic::String(issue_type.description)),
        ("hierarchy_level", Dynamic::from(issue_type.hierarchy_level)),
        ("type", Dynamic::from(type_for_level(issue_type.hierarchy_level))),
        (
            "avatar_id",
            issue_type.avatar_id.map(Dynamic::from).unwrap_or(Dynamic::Null),
        ),
    ])
}

#[async_trait]
impl Resource for IssueTypeResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_type"
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
            .description("Jira Issue Type Resource")
            .attribute(id_attribute("The ID of the issue type."))
            .attribute(name_attribute(
                "The unique name for the issue type. The maximum length is 60 characters.",
                60,
            ))
            .attribute(description_attribute(
                "The description of the issue type.",
                "",
                255,
            ))
            .attribute(
                AttributeBuilder::new("hierarchy_level", AttributeType::Number)
                    .description("The hierarchy level of the issue type: 0 for standard, -1 for sub-task. Changing it replaces the issue type.")
                    .optional()
                    .computed()
                    .validator(IntValues::new(&[LEVEL_STANDARD, LEVEL_SUBTASK]))
                    .plan_modifier(RequiresReplace::create())
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("type", AttributeType::String)
                    .description("Deprecated, use hierarchy_level. Whether the issue type is standard or sub-task.")
                    .optional()
                    .computed()
                    .deprecated()
                    .validator(StringValues::new(&[TYPE_STANDARD, TYPE_SUBTASK]))
                    .plan_modifier(RequiresReplace::create())
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("avatar_id", AttributeType::Number)
                    .description("The ID of the issue type's avatar.")
                    .optional()
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
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
            diagnostics: hierarchy_level(&request.config).err().into_iter().collect(),
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

        // Planned type/hierarchy_level may already be defaulted, so reconcile what was configured
        let level = match hierarchy_level(&request.config) {
            Ok(level) => level,
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
        let create_request = CreateIssueTypeRequest {
            name: string_attr(plan, "name").unwrap_or_default(),
            description: non_empty(string_attr(plan, "description")),
            hierarchy_level: level,
        };

        let mut issue_type = match call(&ctx, client.issue_types().create(&create_request)).await {
            Ok(issue_type) => issue_type,
            Err(e) => {
                diagnostics.push(client_error("create", "issue type", &e));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };
        tracing::info!("Created issue type {} ({})", issue_type.name, issue_type.id);

        // The create endpoint does not take an avatar
        if let Some(avatar_id) = int_attr(plan, "avatar_id") {
            let update = UpdateIssueTypeRequest {
                avatar_id: Some(avatar_id),
                ..Default::default()
            };
            match call(&ctx, client.issue_types().update(&issue_type.id, &update)).await {
                Ok(updated) => issue_type = updated,
                Err(e) => diagnostics.push(client_error("set avatar of", "issue type", &e)),
            }
        }

        CreateResourceResponse {
            new_state: issue_type_state(issue_type),
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

        let Some(id) = string_attr(&request.current_state, "id") else {
            return ReadResourceResponse {
                new_state: None,
                diagnostics,
                private: request.private,
            };
        };

        match call(&ctx, client.issue_types().get(&id)).await {
            Ok(issue_type) => ReadResourceResponse {
                new_state: Some(issue_type_state(issue_type)),
                diagnostics,
                private: request.private,
            },
            Err(e) if e.is_not_found() => {
                tracing::warn!("Issue type {} no longer exists, removing from state", id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("read", "issue type", &e));
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
                "Issue type ID is required for update",
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        };

        let plan = &request.planned_state;
        let update = UpdateIssueTypeRequest {
            name: string_attr(plan, "name"),
            description: string_attr(plan, "description"),
            avatar_id: int_attr(plan, "avatar_id"),
        };

        match call(&ctx, client.issue_types().update(&id, &update)).await {
            Ok(issue_type) => UpdateResourceResponse {
                new_state: issue_type_state(issue_type),
                private: vec![],
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(client_error("update", "issue type", &e));
                UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                }
            }
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

        match call(&ctx, client.issue_types().delete(&id)).await {
            Ok(()) => tracing::info!("Deleted issue type {}", id),
            Err(e) => diagnostics.push(client_error("delete", "issue type", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for IssueTypeResource {
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
impl ResourceWithImportState for IssueTypeResource {
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
#[path = "./resource_issue_type_test.rs"]
mod resource_issue_type_test;
