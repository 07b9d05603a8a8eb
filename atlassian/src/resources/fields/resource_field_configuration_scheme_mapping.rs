//! Issue field configuration scheme mapping resource implementation

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
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::{ApiError, Client};
use crate::resources::common::{
    call, carry_unknown, client_error, composite_id, configure_provider_data, id_attribute,
    not_configured, parse_import_id, state_of, string_attr, HandlerKind,
};
use crate::AtlassianProviderData;

/// Issue type ID Jira uses for the mapping that applies to unmapped issue types
pub const DEFAULT_ISSUE_TYPE: &str = "default";

const KEY_ATTRIBUTES: [&str; 3] = [
    "issue_field_configuration_scheme",
    "issue_field_configuration",
    "issue_type_id",
];

#[derive(Default)]
pub struct FieldConfigurationSchemeMappingResource {
    provider_data: Option<AtlassianProviderData>,
}

impl FieldConfigurationSchemeMappingResource {
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

fn key_attribute(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .required()
        .plan_modifier(RequiresReplace::create())
        .build()
}

/// Scheme, configuration and issue type IDs, in that order
fn mapping_key(value: &DynamicValue) -> Option<[String; 3]> {
    Some([
        string_attr(value, KEY_ATTRIBUTES[0])?,
        string_attr(value, KEY_ATTRIBUTES[1])?,
        string_attr(value, KEY_ATTRIBUTES[2])?,
    ])
}

fn mapping_state(key: [String; 3]) -> DynamicValue {
    let id = composite_id(&key);
    let [scheme, configuration, issue_type] = key;
    state_of([
        ("id", Dynamic::String(id)),
        (KEY_ATTRIBUTES[0], Dynamic::String(scheme)),
        (KEY_ATTRIBUTES[1], Dynamic::String(configuration)),
        (KEY_ATTRIBUTES[2], Dynamic::String(issue_type)),
    ])
}

async fn mapping_exists(
    ctx: &Context,
    client: &Client,
    scheme_id: &str,
    configuration_id: &str,
    issue_type_id: &str,
) -> Result<bool, ApiError> {
    let search = async {
        let mut pages = std::pin::pin!(client.field_configuration_schemes().mappings(scheme_id));
        while let Some(page) = pages.try_next().await? {
            if page.iter().any(|m| {
                m.issue_type_id == issue_type_id && m.field_configuration_id == configuration_id
            }) {
                return Ok(true);
            }
        }
        Ok::<bool, ApiError>(false)
    };
    call(ctx, search).await
}

#[async_trait]
impl Resource for FieldConfigurationSchemeMappingResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_field_configuration_scheme_mapping"
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
            .description("Jira Issue Field Configuration Scheme Mapping Resource")
            .attribute(id_attribute(
                "The ID of the mapping, the scheme, field configuration and issue type IDs joined with hyphens.",
            ))
            .attribute(key_attribute(
                "issue_field_configuration_scheme",
                "The ID of the field configuration scheme. Changing it replaces the mapping.",
            ))
            .attribute(key_attribute(
                "issue_field_configuration",
                "The ID of the field configuration. Changing it replaces the mapping.",
            ))
            .attribute(key_attribute(
                "issue_type_id",
                "The ID of the issue type, or 'default' for issue types without their own mapping. Changing it replaces the mapping.",
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

        let Some(key) = mapping_key(&request.planned_state) else {
            diagnostics.push(Diagnostic::error(
                "Missing mapping",
                "The scheme, field configuration and issue type IDs are all required",
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        };

        let [scheme, configuration, issue_type] = &key;
        match call(
            &ctx,
            client
                .field_configuration_schemes()
                .link(scheme, issue_type, configuration),
        )
        .await
        {
            Ok(()) => {
                tracing::info!(
                    "Mapped issue type {} to field configuration {} in scheme {}",
                    issue_type,
                    configuration,
                    scheme
                );
                CreateResourceResponse {
                    new_state: mapping_state(key),
                    private: vec![],
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(client_error(
                    "create",
                    "field configuration scheme mapping",
                    &e,
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

        let Some(key) = mapping_key(&request.current_state) else {
            return ReadResourceResponse {
                new_state: None,
                diagnostics,
                private: request.private,
            };
        };

        let [scheme, configuration, issue_type] = &key;
        match mapping_exists(&ctx, client, scheme, configuration, issue_type).await {
            Ok(true) => ReadResourceResponse {
                new_state: Some(mapping_state(key)),
                diagnostics,
                private: request.private,
            },
            Ok(false) => {
                tracing::warn!(
                    "Scheme {} no longer maps issue type {} to {}, removing from state",
                    scheme,
                    issue_type,
                    configuration
                );
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error(
                    "read",
                    "field configuration scheme mapping",
                    &e,
                ));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                }
            }
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        // every attribute forces replacement
        UpdateResourceResponse {
            new_state: carry_unknown(&request.planned_state, &request.prior_state),
            private: vec![],
            diagnostics: vec![],
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let Some([scheme, _, issue_type]) = mapping_key(&request.prior_state) else {
            return DeleteResourceResponse { diagnostics };
        };

        if issue_type == DEFAULT_ISSUE_TYPE {
            tracing::warn!(
                "Default mapping of scheme {} removed from state only",
                scheme
            );
            diagnostics.push(Diagnostic::warning(
                "Default Mapping Not Deleted",
                format!(
                    "Jira requires every field configuration scheme to keep a default mapping. The default mapping of scheme {} was removed from state but still exists in Jira.",
                    scheme
                ),
            ));
            return DeleteResourceResponse { diagnostics };
        }

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        match call(
            &ctx,
            client
                .field_configuration_schemes()
                .unlink(&scheme, &issue_type),
        )
        .await
        {
            Ok(()) => tracing::info!(
                "Unmapped issue type {} from scheme {}",
                issue_type,
                scheme
            ),
            Err(e) => diagnostics.push(client_error(
                "delete",
                "field configuration scheme mapping",
                &e,
            )),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for FieldConfigurationSchemeMappingResource {
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
impl ResourceWithImportState for FieldConfigurationSchemeMappingResource {
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };

        match parse_import_id(&request.id, &KEY_ATTRIBUTES) {
            Ok(parts) => {
                let mut attributes = vec![(AttributePath::new("id"), composite_id(&parts))];
                attributes.extend(
                    KEY_ATTRIBUTES
                        .iter()
                        .zip(parts)
                        .map(|(name, part)| (AttributePath::new(name), part)),
                );
                import_state_attributes(attributes, &request, &mut response);
            }
            Err(diag) => response.diagnostics.push(diag),
        }

        response
    }
}

#[cfg(test)]
#[path = "./resource_field_configuration_scheme_mapping_test.rs"]
mod resource_field_configuration_scheme_mapping_test;
