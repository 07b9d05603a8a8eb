//! Issue screen resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::SchemaBuilder;
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::screens::{Screen, ScreenRequest};
use crate::api::Client;
use crate::resources::common::{
    call, client_error, configure_provider_data, description_attribute, id_attribute,
    name_attribute, non_empty, not_configured, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct IssueScreenResource {
    provider_data: Option<AtlassianProviderData>,
}

impl IssueScreenResource {
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

pub(crate) fn screen_state(screen: Screen) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(screen.id.to_string())),
        ("name", Dynamic::String(screen.name)),
        (
            "description",
            Dynamic::String(screen.description.unwrap_or_default()),
        ),
    ])
}

#[async_trait]
impl Resource for IssueScreenResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_screen"
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
            .description("Jira Issue Screen Resource")
            .attribute(id_attribute("The ID of the screen."))
            .attribute(name_attribute(
                "The name of the screen. The name must be unique. The maximum length is 255 characters.",
                255,
            ))
            .attribute(description_attribute(
                "The description of the screen. The maximum length is 255 characters.",
                "",
                255,
            ))
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

        let plan = &request.planned_state;
        let create_request = ScreenRequest {
            name: string_attr(plan, "name").unwrap_or_default(),
            description: non_empty(string_attr(plan, "description")),
        };

        match call(&ctx, client.screens().create(&create_request)).await {
            Ok(screen) => {
                tracing::info!("Created screen {} ({})", screen.name, screen.id);
                CreateResourceResponse {
                    new_state: screen_state(screen),
                    private: vec![],
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("create", "screen", &e));
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

        match call(&ctx, client.screens().get(&id)).await {
            Ok(Some(screen)) => ReadResourceResponse {
                new_state: Some(screen_state(screen)),
                diagnostics,
                private: request.private,
            },
            Ok(None) => {
                tracing::warn!("Screen {} no longer exists, removing from state", id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("read", "screen", &e));
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
            diagnostics.push(Diagnostic::error("Missing ID", "Screen ID is required for update"));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        };

        let plan = &request.planned_state;
        let update = ScreenRequest {
            name: string_attr(plan, "name").unwrap_or_default(),
            description: string_attr(plan, "description"),
        };

        match call(&ctx, client.screens().update(&id, &update)).await {
            Ok(screen) => UpdateResourceResponse {
                new_state: screen_state(screen),
                private: vec![],
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(client_error("update", "screen", &e));
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

        match call(&ctx, client.screens().delete(&id)).await {
            Ok(()) => tracing::info!("Deleted screen {}", id),
            Err(e) => diagnostics.push(client_error("delete", "screen", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for IssueScreenResource {
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
impl ResourceWithImportState for IssueScreenResource {
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
#[path = "./resource_issue_screen_test.rs"]
mod resource_issue_screen_test;
