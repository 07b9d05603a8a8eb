//! Screen scheme resource implementation

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
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::screen_schemes::{ScreenScheme, ScreenSchemeRequest, ScreenTypes};
use crate::api::Client;
use crate::resources::common::{
    call, client_error, configure_provider_data, description_attribute, id_attribute,
    name_attribute, non_empty, not_configured, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct ScreenSchemeResource {
    provider_data: Option<AtlassianProviderData>,
}

impl ScreenSchemeResource {
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

pub(crate) fn screens_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("default", AttributeType::Number)
            .description("The ID of the screen used for operations without a screen of their own.")
            .required()
            .build(),
        AttributeBuilder::new("create", AttributeType::Number)
            .description("The ID of the create screen.")
            .optional()
            .build(),
        AttributeBuilder::new("edit", AttributeType::Number)
            .description("The ID of the edit screen.")
            .optional()
            .build(),
        AttributeBuilder::new("view", AttributeType::Number)
            .description("The ID of the view screen.")
            .optional()
            .build(),
    ]
}

fn screen_id(value: &DynamicValue, operation: &str) -> Option<i64> {
    value
        .get_number(&AttributePath::new("screens").attribute(operation))
        .ok()
        .map(|n| n as i64)
}

/// `None` when the required default screen is missing
fn screens_from(value: &DynamicValue) -> Option<ScreenTypes> {
    Some(ScreenTypes {
        default: screen_id(value, "default")?,
        create: screen_id(value, "create"),
        edit: screen_id(value, "edit"),
        view: screen_id(value, "view"),
    })
}

pub(crate) fn screens_value(screens: ScreenTypes) -> Dynamic {
    let optional = |id: Option<i64>| id.map(Dynamic::from).unwrap_or(Dynamic::Null);
    Dynamic::object([
        ("default", Dynamic::from(screens.default)),
        ("create", optional(screens.create)),
        ("edit", optional(screens.edit)),
        ("view", optional(screens.view)),
    ])
}

pub(crate) fn screen_scheme_state(scheme: ScreenScheme) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(scheme.id.to_string())),
        ("name", Dynamic::String(scheme.name)),
        (
            "description",
            Dynamic::String(scheme.description.unwrap_or_default()),
        ),
        ("screens", screens_value(scheme.screens)),
    ])
}

fn missing_default_screen() -> Diagnostic {
    Diagnostic::error(
        "Missing default screen",
        "The 'screens.default' attribute is required",
    )
    .with_attribute(AttributePath::new("screens").attribute("default"))
}

#[async_trait]
impl Resource for ScreenSchemeResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_screen_scheme"
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
            .description("Jira Screen Scheme Resource")
            .attribute(id_attribute("The ID of the screen scheme."))
            .attribute(name_attribute(
                "The name of the screen scheme. The name must be unique. The maximum length is 255 characters.",
                255,
            ))
            .attribute(description_attribute(
                "The description of the screen scheme. The maximum length is 255 characters.",
                "",
                255,
            ))
            .attribute(
                AttributeBuilder::single_nested("screens", screens_attributes())
                    .description("The IDs of the screens for the screen types of the screen scheme. Only screens used in classic projects are accepted.")
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
        let Some(screens) = screens_from(plan) else {
            diagnostics.push(missing_default_screen());
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        };
        let create_request = ScreenSchemeRequest {
            name: string_attr(plan, "name").unwrap_or_default(),
            description: non_empty(string_attr(plan, "description")),
            screens,
        };

        let id = match call(&ctx, client.screen_schemes().create(&create_request)).await {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(client_error("create", "screen scheme", &e));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };
        tracing::info!("Created screen scheme {} ({})", create_request.name, id);

        let scheme = ScreenScheme {
            id,
            name: create_request.name,
            description: string_attr(plan, "description"),
            screens: create_request.screens,
        };

        CreateResourceResponse {
            new_state: screen_scheme_state(scheme),
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

        match call(&ctx, client.screen_schemes().get(&id)).await {
            Ok(Some(scheme)) => ReadResourceResponse {
                new_state: Some(screen_scheme_state(scheme)),
                diagnostics,
                private: request.private,
            },
            Ok(None) => {
                tracing::warn!("Screen scheme {} no longer exists, removing from state", id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("read", "screen scheme", &e));
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
                "Screen scheme ID is required for update",
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        };

        let plan = &request.planned_state;
        let Some(screens) = screens_from(plan) else {
            diagnostics.push(missing_default_screen());
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        };
        let update = ScreenSchemeRequest {
            name: string_attr(plan, "name").unwrap_or_default(),
            description: string_attr(plan, "description"),
            screens,
        };

        if let Err(e) = call(&ctx, client.screen_schemes().update(&id, &update)).await {
            diagnostics.push(client_error("update", "screen scheme", &e));
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

        match call(&ctx, client.screen_schemes().delete(&id)).await {
            Ok(()) => tracing::info!("Deleted screen scheme {}", id),
            Err(e) => diagnostics.push(client_error("delete", "screen scheme", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for ScreenSchemeResource {
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
impl ResourceWithImportState for ScreenSchemeResource {
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
#[path = "./resource_screen_scheme_test.rs"]
mod resource_screen_scheme_test;
