//! Issue type screen scheme resource implementation

use async_trait::async_trait;
use futures::TryStreamExt;
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

use crate::api::issue_type_screen_schemes::{
    CreateIssueTypeScreenSchemeRequest, IssueTypeScreenScheme, IssueTypeScreenSchemeMapping,
    UpdateIssueTypeScreenSchemeRequest, DEFAULT_ISSUE_TYPE,
};
use crate::api::{ApiError, Client};
use crate::resources::common::{
    call, client_error, configure_provider_data, description_attribute, id_attribute,
    name_attribute, non_empty, not_configured, reconcile_order, state_of, string_attr,
    HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct IssueTypeScreenSchemeResource {
    provider_data: Option<AtlassianProviderData>,
}

impl IssueTypeScreenSchemeResource {
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

pub(crate) fn mapping_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("issue_type_id", AttributeType::String)
            .description("The ID of the issue type, or 'default' for issue types without a mapping of their own.")
            .required()
            .build(),
        AttributeBuilder::new("screen_scheme_id", AttributeType::String)
            .description("The ID of the screen scheme.")
            .required()
            .build(),
    ]
}

fn mappings_from(value: &DynamicValue) -> Vec<IssueTypeScreenSchemeMapping> {
    value
        .get_list(&AttributePath::new("issue_type_mappings"))
        .unwrap_or_default()
        .iter()
        .filter_map(|item| {
            Some(IssueTypeScreenSchemeMapping {
                issue_type_id: item.attr("issue_type_id").as_str()?.to_string(),
                screen_scheme_id: item.attr("screen_scheme_id").as_str()?.to_string(),
            })
        })
        .collect()
}

pub(crate) fn mappings_value(mappings: Vec<IssueTypeScreenSchemeMapping>) -> Dynamic {
    Dynamic::List(
        mappings
            .into_iter()
            .map(|m| {
                Dynamic::object([
                    ("issue_type_id", Dynamic::String(m.issue_type_id)),
                    ("screen_scheme_id", Dynamic::String(m.screen_scheme_id)),
                ])
            })
            .collect(),
    )
}

fn default_mapping(mappings: &[IssueTypeScreenSchemeMapping]) -> Option<&IssueTypeScreenSchemeMapping> {
    mappings
        .iter()
        .find(|m| m.issue_type_id == DEFAULT_ISSUE_TYPE)
}

fn check_default_mapping(value: &DynamicValue) -> Option<Diagnostic> {
    if !value.is_known(&AttributePath::new("issue_type_mappings")) {
        return None;
    }
    if default_mapping(&mappings_from(value)).is_some() {
        return None;
    }
    Some(
        Diagnostic::error(
            "Missing Default Mapping",
            "issue_type_mappings must contain a mapping with issue_type_id \"default\"",
        )
        .with_attribute(AttributePath::new("issue_type_mappings")),
    )
}

/// Every mapping of a scheme across all pages
pub(crate) async fn scheme_mappings(
    ctx: &Context,
    client: &Client,
    scheme_id: &str,
) -> Result<Vec<IssueTypeScreenSchemeMapping>, ApiError> {
    let pages = client.issue_type_screen_schemes().mappings(scheme_id);
    call(ctx, pages.try_concat()).await
}

pub(crate) fn scheme_state(
    scheme: IssueTypeScreenScheme,
    mappings: Vec<IssueTypeScreenSchemeMapping>,
) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(scheme.id)),
        ("name", Dynamic::String(scheme.name)),
        (
            "description",
            Dynamic::String(scheme.description.unwrap_or_default()),
        ),
        ("issue_type_mappings", mappings_value(mappings)),
    ])
}

/// Remote calls needed to move a scheme's mappings from `prior` to `planned`
#[derive(Debug, Default, PartialEq)]
struct MappingChanges {
    new_default: Option<String>,
    /// Issue types whose screen scheme changed; unmapped before being appended again
    remapped: Vec<String>,
    append: Vec<IssueTypeScreenSchemeMapping>,
    remove: Vec<String>,
}

impl MappingChanges {
    fn between(
        prior: &[IssueTypeScreenSchemeMapping],
        planned: &[IssueTypeScreenSchemeMapping],
    ) -> Self {
        let prior_default = default_mapping(prior);
        let planned_default = default_mapping(planned);
        let new_default = match planned_default {
            Some(d) if Some(d) != prior_default => Some(d.screen_scheme_id.clone()),
            _ => None,
        };

        let non_default = |m: &&IssueTypeScreenSchemeMapping| m.issue_type_id != DEFAULT_ISSUE_TYPE;

        let append: Vec<IssueTypeScreenSchemeMapping> = planned
            .iter()
            .filter(non_default)
            .filter(|m| !prior.contains(m))
            .cloned()
            .collect();

        let remapped: Vec<String> = append
            .iter()
            .filter(|m| prior.iter().any(|p| p.issue_type_id == m.issue_type_id))
            .map(|m| m.issue_type_id.clone())
            .collect();

        let remove: Vec<String> = prior
            .iter()
            .filter(non_default)
            .filter(|p| !planned.iter().any(|m| m.issue_type_id == p.issue_type_id))
            .map(|p| p.issue_type_id.clone())
            .collect();

        Self {
            new_default,
            remapped,
            append,
            remove,
        }
    }
}

#[async_trait]
impl Resource for IssueTypeScreenSchemeResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_type_screen_scheme"
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
            .description("Jira Issue Type Screen Scheme Resource")
            .attribute(id_attribute("The ID of the issue type screen scheme."))
            .attribute(name_attribute(
                "The name of the issue type screen scheme. The name must be unique. The maximum length is 255 characters.",
                255,
            ))
            .attribute(description_attribute(
                "The description of the issue type screen scheme. The maximum length is 255 characters.",
                "",
                255,
            ))
            .attribute(
                AttributeBuilder::list_nested("issue_type_mappings", mapping_attributes())
                    .description("The IDs of the screen schemes for the issue type IDs and default. A default entry is required to create an issue type screen scheme.")
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
            diagnostics: check_default_mapping(&request.config).into_iter().collect(),
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

        if let Some(diag) = check_default_mapping(&request.planned_state) {
            diagnostics.push(diag);
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        }

        let plan = &request.planned_state;
        let create_request = CreateIssueTypeScreenSchemeRequest {
            name: string_attr(plan, "name").unwrap_or_default(),
            description: non_empty(string_attr(plan, "description")),
            issue_type_mappings: mappings_from(plan),
        };

        let id = match call(&ctx, client.issue_type_screen_schemes().create(&create_request)).await
        {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(client_error("create", "issue type screen scheme", &e));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };
        tracing::info!(
            "Created issue type screen scheme {} ({})",
            create_request.name,
            id
        );

        let mut new_state = request.planned_state;
        if let Err(e) = new_state.set_string(&AttributePath::new("id"), id) {
            diagnostics.push(Diagnostic::error("Failed to set id", e.to_string()));
        }

        CreateResourceResponse {
            new_state,
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

        let scheme = match call(&ctx, client.issue_type_screen_schemes().get(&id)).await {
            Ok(Some(scheme)) => scheme,
            Ok(None) => {
                tracing::warn!(
                    "Issue type screen scheme {} no longer exists, removing from state",
                    id
                );
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                };
            }
            Err(e) => {
                diagnostics.push(client_error("read", "issue type screen scheme", &e));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        match scheme_mappings(&ctx, client, &id).await {
            Ok(remote) => {
                let prior = mappings_from(&request.current_state);
                ReadResourceResponse {
                    new_state: Some(scheme_state(scheme, reconcile_order(&prior, &remote))),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error(
                    "read",
                    "issue type screen scheme mappings",
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

        if let Some(diag) = check_default_mapping(&request.planned_state) {
            diagnostics.push(diag);
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        }

        let Some(id) = string_attr(&request.prior_state, "id") else {
            diagnostics.push(Diagnostic::error(
                "Missing ID",
                "Issue type screen scheme ID is required for update",
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        };

        let plan = &request.planned_state;
        let prior = &request.prior_state;
        let api = client.issue_type_screen_schemes();

        // Stops at the first failure; earlier steps are not rolled back
        let result = async {
            if string_attr(plan, "name") != string_attr(prior, "name")
                || string_attr(plan, "description") != string_attr(prior, "description")
            {
                let details = UpdateIssueTypeScreenSchemeRequest {
                    name: string_attr(plan, "name").unwrap_or_default(),
                    description: string_attr(plan, "description"),
                };
                api.update(&id, &details)
                    .await
                    .map_err(|e| ("update", e))?;
            }

            let changes = MappingChanges::between(&mappings_from(prior), &mappings_from(plan));
            tracing::debug!("Issue type screen scheme {} mapping changes: {:?}", id, changes);

            if let Some(screen_scheme_id) = &changes.new_default {
                api.set_default(&id, screen_scheme_id)
                    .await
                    .map_err(|e| ("update default mapping of", e))?;
            }
            if !changes.remapped.is_empty() {
                api.remove_mappings(&id, &changes.remapped)
                    .await
                    .map_err(|e| ("remove mappings from", e))?;
            }
            if !changes.append.is_empty() {
                api.append_mappings(&id, &changes.append)
                    .await
                    .map_err(|e| ("append mappings to", e))?;
            }
            if !changes.remove.is_empty() {
                api.remove_mappings(&id, &changes.remove)
                    .await
                    .map_err(|e| ("remove mappings from", e))?;
            }
            Ok::<(), (&str, ApiError)>(())
        };

        let outcome = match ctx.run(result).await {
            Some(outcome) => outcome,
            None => Err(("update", ApiError::Cancelled)),
        };
        if let Err((verb, e)) = outcome {
            diagnostics.push(client_error(verb, "issue type screen scheme", &e));
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

        match call(&ctx, client.issue_type_screen_schemes().delete(&id)).await {
            Ok(()) => tracing::info!("Deleted issue type screen scheme {}", id),
            Err(e) => diagnostics.push(client_error("delete", "issue type screen scheme", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for IssueTypeScreenSchemeResource {
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
impl ResourceWithImportState for IssueTypeScreenSchemeResource {
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
#[path = "./resource_issue_type_screen_scheme_test.rs"]
mod resource_issue_type_screen_scheme_test;
