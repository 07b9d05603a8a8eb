//! Issue field configuration item resource implementation
//!
//! Jira has no endpoint for removing an item from a field configuration, so
//! destroying this resource only forgets it.

use async_trait::async_trait;
use futures::TryStreamExt;
use tfplug::context::Context;
use tfplug::import::import_state_attributes;
use tfplug::plan_modifier::{DefaultValue, RequiresReplace, UseStateForUnknown};
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
use tfplug::validator::{StringMatches, StringValues};

use crate::api::field_configurations::FieldConfigurationItem;
use crate::api::{ApiError, Client};
use crate::resources::common::{
    call, client_error, composite_id, configure_provider_data, id_attribute, not_configured,
    parse_import_id, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

pub const RENDERERS: &[&str] = &["text-renderer", "wiki-renderer"];

#[derive(Default)]
pub struct FieldConfigurationItemResource {
    provider_data: Option<AtlassianProviderData>,
}

impl FieldConfigurationItemResource {
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

fn item_path(name: &str) -> AttributePath {
    AttributePath::new("item").attribute(name)
}

fn item_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("id", AttributeType::String)
            .description("The ID of the field, a system field name such as 'summary' or a custom field ID such as 'customfield_10010'. Changing it replaces the item.")
            .required()
            .validator(StringMatches::new(
                &["^customfield_[0-9]{5}$", "^[a-zA-Z]*$"],
                "must be a system field name or a custom field ID like customfield_10010",
            ))
            .plan_modifier(RequiresReplace::create())
            .build(),
        AttributeBuilder::new("description", AttributeType::String)
            .description("The description of the field.")
            .optional()
            .computed()
            .plan_modifier(UseStateForUnknown::create())
            .build(),
        AttributeBuilder::new("is_hidden", AttributeType::Bool)
            .description("Whether the field is hidden in the field configuration.")
            .optional()
            .computed()
            .plan_modifier(DefaultValue::bool(false))
            .build(),
        AttributeBuilder::new("is_required", AttributeType::Bool)
            .description("Whether the field is required in the field configuration.")
            .optional()
            .computed()
            .plan_modifier(DefaultValue::bool(false))
            .build(),
        AttributeBuilder::new("renderer", AttributeType::String)
            .description("The renderer type for the field: text-renderer or wiki-renderer. Only free text fields accept a renderer.")
            .optional()
            .computed()
            .validator(StringValues::new(RENDERERS))
            .plan_modifier(UseStateForUnknown::create())
            .build(),
    ]
}

fn item_from(value: &DynamicValue) -> Option<FieldConfigurationItem> {
    Some(FieldConfigurationItem {
        id: value.get_string(&item_path("id")).ok()?,
        description: value.get_string(&item_path("description")).ok(),
        is_hidden: value.get_bool(&item_path("is_hidden")).unwrap_or(false),
        is_required: value.get_bool(&item_path("is_required")).unwrap_or(false),
        renderer: value.get_string(&item_path("renderer")).ok(),
    })
}

fn item_state(field_configuration_id: &str, item: FieldConfigurationItem) -> DynamicValue {
    state_of([
        (
            "id",
            Dynamic::String(composite_id(&[field_configuration_id, item.id.as_str()])),
        ),
        (
            "issue_field_configuration",
            Dynamic::from(field_configuration_id),
        ),
        (
            "item",
            Dynamic::object([
                ("id", Dynamic::String(item.id)),
                ("description", Dynamic::string_or_null(item.description)),
                ("is_hidden", Dynamic::Bool(item.is_hidden)),
                ("is_required", Dynamic::Bool(item.is_required)),
                ("renderer", Dynamic::string_or_null(item.renderer)),
            ]),
        ),
    ])
}

/// Looks for one item, stopping at the page that holds it
async fn find_item(
    ctx: &Context,
    client: &Client,
    field_configuration_id: &str,
    item_id: &str,
) -> Result<Option<FieldConfigurationItem>, ApiError> {
    let search = async {
        let mut pages = std::pin::pin!(client.field_configurations().items(field_configuration_id));
        while let Some(page) = pages.try_next().await? {
            if let Some(item) = page.into_iter().find(|i| i.id == item_id) {
                return Ok(Some(item));
            }
        }
        Ok::<Option<FieldConfigurationItem>, ApiError>(None)
    };
    call(ctx, search).await
}

/// A renderer can only be set on an unlocked free text field
async fn check_renderer(ctx: &Context, client: &Client, field_id: &str) -> Result<(), Diagnostic> {
    let field = match call(ctx, client.field_configurations().search_field(field_id)).await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return Err(Diagnostic::error(
                "Field Not Found",
                format!("The field {:?} does not exist", field_id),
            )
            .with_attribute(item_path("id")))
        }
        Err(e) => return Err(client_error("search", "field", &e)),
    };

    if field.is_locked {
        return Err(Diagnostic::error(
            "Field Is Locked",
            format!(
                "The field {:?} is locked, its renderer cannot be changed",
                field_id
            ),
        )
        .with_attribute(item_path("renderer")));
    }
    if !field.is_renderable() {
        return Err(Diagnostic::error(
            "Field Not Renderable",
            format!(
                "The field {:?} is not a text field, only text fields accept a renderer",
                field_id
            ),
        )
        .with_attribute(item_path("renderer")));
    }
    Ok(())
}

impl FieldConfigurationItemResource {
    /// Writes the planned item and reads it back
    async fn apply(&self, ctx: &Context, plan: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = self.client()?;

        let (Some(field_configuration_id), Some(item)) = (
            string_attr(plan, "issue_field_configuration"),
            item_from(plan),
        ) else {
            return Err(Diagnostic::error(
                "Missing field configuration item",
                "Both 'issue_field_configuration' and 'item.id' are required",
            ));
        };

        if item.renderer.is_some() {
            check_renderer(ctx, client, &item.id).await?;
        }

        call(
            ctx,
            client
                .field_configurations()
                .update_items(&field_configuration_id, std::slice::from_ref(&item)),
        )
        .await
        .map_err(|e| client_error("update", "field configuration item", &e))?;
        tracing::info!(
            "Updated field configuration item {} of {}",
            item.id,
            field_configuration_id
        );

        match find_item(ctx, client, &field_configuration_id, &item.id).await {
            Ok(Some(written)) => Ok(item_state(&field_configuration_id, written)),
            Ok(None) => Err(Diagnostic::error(
                "Field configuration item not found",
                format!(
                    "Item {} is missing from field configuration {} after update",
                    item.id, field_configuration_id
                ),
            )),
            Err(e) => Err(client_error("read", "field configuration item", &e)),
        }
    }
}

#[async_trait]
impl Resource for FieldConfigurationItemResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_field_configuration_item"
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
            .description("Jira Issue Field Configuration Item Resource")
            .attribute(id_attribute(
                "The ID of the item, the field configuration ID and field ID joined with a hyphen.",
            ))
            .attribute(
                AttributeBuilder::new("issue_field_configuration", AttributeType::String)
                    .description("The ID of the field configuration. Changing it replaces the item.")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::single_nested("item", item_attributes())
                    .description("The field configuration item.")
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
        match self.apply(&ctx, &request.planned_state).await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                private: vec![],
                diagnostics: vec![],
            },
            Err(diag) => CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics: vec![diag],
            },
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

        let (Some(field_configuration_id), Ok(item_id)) = (
            string_attr(&request.current_state, "issue_field_configuration"),
            request.current_state.get_string(&item_path("id")),
        ) else {
            return ReadResourceResponse {
                new_state: None,
                diagnostics,
                private: request.private,
            };
        };

        match find_item(&ctx, client, &field_configuration_id, &item_id).await {
            Ok(Some(item)) => ReadResourceResponse {
                new_state: Some(item_state(&field_configuration_id, item)),
                diagnostics,
                private: request.private,
            },
            Ok(None) => {
                tracing::warn!(
                    "Field configuration {} has no item {}, removing from state",
                    field_configuration_id,
                    item_id
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
                diagnostics.push(client_error("read", "field configuration item", &e));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                }
            }
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.apply(&ctx, &request.planned_state).await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                private: vec![],
                diagnostics: vec![],
            },
            Err(diag) => UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics: vec![diag],
            },
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let id = string_attr(&request.prior_state, "id").unwrap_or_default();
        tracing::warn!("Removing field configuration item {} from state only", id);

        DeleteResourceResponse {
            diagnostics: vec![Diagnostic::warning(
                "Field Configuration Item Not Deleted",
                format!(
                    "Jira cannot delete field configuration items. Item {} was removed from state and keeps its current settings in Jira.",
                    id
                ),
            )],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for FieldConfigurationItemResource {
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
impl ResourceWithImportState for FieldConfigurationItemResource {
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };

        match parse_import_id(&request.id, &["issue_field_configuration", "item_id"]) {
            Ok(parts) => {
                let id = composite_id(&parts);
                import_state_attributes(
                    vec![
                        (AttributePath::new("id"), id),
                        (
                            AttributePath::new("issue_field_configuration"),
                            parts[0].clone(),
                        ),
                        (item_path("id"), parts[1].clone()),
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
#[path = "./resource_field_configuration_item_test.rs"]
mod resource_field_configuration_item_test;
