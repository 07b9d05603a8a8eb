//! Issue type scheme resource implementation

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
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::issue_type_schemes::{
    CreateIssueTypeSchemeRequest, IssueTypeScheme, UpdateIssueTypeSchemeRequest,
};
use crate::api::{ApiError, Client};
use crate::resources::common::{
    call, client_error, configure_provider_data, description_attribute, id_attribute,
    name_attribute, non_empty, not_configured, reconcile_order, state_of, string_attr,
    string_list_attr, HandlerKind,
};
use crate::AtlassianProviderData;

#[derive(Default)]
pub struct IssueTypeSchemeResource {
    provider_data: Option<AtlassianProviderData>,
}

impl IssueTypeSchemeResource {
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

/// The default issue type has to be one of the scheme's issue types
fn check_default(value: &DynamicValue) -> Option<Diagnostic> {
    let default = string_attr(value, "default_issue_type_id")?;
    if !value.is_known(&AttributePath::new("issue_type_ids")) {
        return None;
    }
    let issue_type_ids = string_list_attr(value, "issue_type_ids");
    if issue_type_ids.contains(&default) {
        return None;
    }
    Some(
        Diagnostic::error(
            "Invalid Default Issue Type",
            format!(
                "The default issue type {:?} must be one of issue_type_ids {:?}",
                default, issue_type_ids
            ),
        )
        .with_attribute(AttributePath::new("default_issue_type_id")),
    )
}

/// Issue type ids of a scheme across every mapping page
pub(crate) async fn scheme_issue_type_ids(
    ctx: &Context,
    client: &Client,
    scheme_id: &str,
) -> Result<Vec<String>, ApiError> {
    let pages = client.issue_type_schemes().mappings(scheme_id);
    let mappings = call(ctx, pages.try_concat()).await?;
    Ok(mappings
        .into_iter()
        .filter(|m| m.issue_type_scheme_id == scheme_id)
        .map(|m| m.issue_type_id)
        .collect())
}

fn scheme_state(scheme: IssueTypeScheme, issue_type_ids: Vec<String>) -> DynamicValue {
    state_of([
        ("id", Dynamic::String(scheme.id)),
        ("name", Dynamic::String(scheme.name)),
        (
            "description",
            Dynamic::String(scheme.description.unwrap_or_default()),
        ),
        (
            "default_issue_type_id",
            Dynamic::string_or_null(scheme.default_issue_type_id),
        ),
        (
            "issue_type_ids",
            Dynamic::List(issue_type_ids.into_iter().map(Dynamic::String).collect()),
        ),
    ])
}

#[async_trait]
impl Resource for IssueTypeSchemeResource {
    fn type_name(&self) -> &str {
        "atlassian_jira_issue_type_scheme"
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
            .description("Jira Issue Type Scheme Resource")
            .attribute(id_attribute("The ID of the issue type scheme."))
            .attribute(name_attribute(
                "The name of the issue type scheme. The name must be unique.",
                255,
            ))
            .attribute(description_attribute(
                "The description of the issue type scheme.",
                "",
                4000,
            ))
            .attribute(
                AttributeBuilder::new("default_issue_type_id", AttributeType::String)
                    .description("The ID of the default issue type of the issue type scheme. It must be one of issue_type_ids.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "issue_type_ids",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .description("The list of issue type IDs in the scheme. Issue types can be added but not removed.")
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
            diagnostics: check_default(&request.config).into_iter().collect(),
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

        if let Some(diag) = check_default(&request.planned_state) {
            diagnostics.push(diag);
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        }

        let plan = &request.planned_state;
        let create_request = CreateIssueTypeSchemeRequest {
            name: string_attr(plan, "name").unwrap_or_default(),
            description: non_empty(string_attr(plan, "description")),
            default_issue_type_id: string_attr(plan, "default_issue_type_id"),
            issue_type_ids: string_list_attr(plan, "issue_type_ids"),
        };

        let id = match call(&ctx, client.issue_type_schemes().create(&create_request)).await {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(client_error("create", "issue type scheme", &e));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };
        tracing::info!("Created issue type scheme {} ({})", create_request.name, id);

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

        let scheme = match call(&ctx, client.issue_type_schemes().get(&id)).await {
            Ok(Some(scheme)) => scheme,
            Ok(None) => {
                tracing::warn!("Issue type scheme {} no longer exists, removing from state", id);
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                };
            }
            Err(e) => {
                diagnostics.push(client_error("read", "issue type scheme", &e));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        match scheme_issue_type_ids(&ctx, client, &id).await {
            Ok(remote_ids) => {
                let prior_ids = string_list_attr(&request.current_state, "issue_type_ids");
                let issue_type_ids = reconcile_order(&prior_ids, &remote_ids);
                ReadResourceResponse {
                    new_state: Some(scheme_state(scheme, issue_type_ids)),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) => {
                diagnostics.push(client_error("read", "issue type scheme mappings", &e));
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

        if let Some(diag) = check_default(&request.planned_state) {
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
                "Issue type scheme ID is required for update",
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        };

        let plan = &request.planned_state;
        let prior = &request.prior_state;

        let details_changed = ["name", "description", "default_issue_type_id"]
            .iter()
            .any(|name| string_attr(plan, name) != string_attr(prior, name));
        if details_changed {
            let update = UpdateIssueTypeSchemeRequest {
                name: string_attr(plan, "name").unwrap_or_default(),
                description: string_attr(plan, "description"),
                default_issue_type_id: string_attr(plan, "default_issue_type_id"),
            };
            if let Err(e) = call(&ctx, client.issue_type_schemes().update(&id, &update)).await {
                diagnostics.push(client_error("update", "issue type scheme", &e));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        }

        let planned_ids = string_list_attr(plan, "issue_type_ids");
        let prior_ids = string_list_attr(prior, "issue_type_ids");

        let additions: Vec<String> = planned_ids
            .iter()
            .filter(|i| !prior_ids.contains(i))
            .cloned()
            .collect();
        if !additions.is_empty() {
            if let Err(e) = call(
                &ctx,
                client.issue_type_schemes().add_issue_types(&id, &additions),
            )
            .await
            {
                diagnostics.push(client_error("add issue types to", "issue type scheme", &e));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        }

        let removals: Vec<&String> = prior_ids.iter().filter(|i| !planned_ids.contains(i)).collect();
        if !removals.is_empty() {
            tracing::warn!("Ignoring removal of issue types {:?} from scheme {}", removals, id);
            diagnostics.push(
                Diagnostic::warning(
                    "Issue Type Removal Not Supported",
                    format!(
                        "Issue types {:?} were not removed from issue type scheme {}. Issue types can only be added to a scheme.",
                        removals, id
                    ),
                )
                .with_attribute(AttributePath::new("issue_type_ids")),
            );
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

        match call(&ctx, client.issue_type_schemes().delete(&id)).await {
            Ok(()) => tracing::info!("Deleted issue type scheme {}", id),
            Err(e) => diagnostics.push(client_error("delete", "issue type scheme", &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for IssueTypeSchemeResource {
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
impl ResourceWithImportState for IssueTypeSchemeResource {
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
#[path = "./resource_issue_type_scheme_test.rs"]
mod resource_issue_type_scheme_test;
