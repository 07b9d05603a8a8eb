//! In-process provider host
//!
//! `ProviderServer` drives a provider the way the Terraform host does:
//! schema validation, planning, apply routing, refresh and import. Every
//! call builds a fresh handler from the provider's factories and configures
//! it with the provider data stored by `configure_provider`.

use crate::context::Context;
use crate::data_source::{
    ConfigureDataSourceRequest, DataSourceSchemaRequest, DataSourceWithConfigure,
    ReadDataSourceRequest, ReadDataSourceResponse, ValidateDataSourceConfigRequest,
};
use crate::error::TfplugError;
use crate::provider::{
    ConfigureProviderRequest, DataSourceFactory, Provider, ProviderMetadataRequest,
    ProviderSchemaRequest, ResourceFactory, ValidateProviderConfigRequest,
};
use crate::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest,
    ImportResourceStateRequest, ImportResourceStateResponse, ManagedResource,
    ReadResourceRequest, ReadResourceResponse, ResourceSchemaRequest, UpdateResourceRequest,
    ValidateResourceConfigRequest,
};
use crate::schema::{Attribute, ObjectNestingMode, PlanModifierRequest, Schema, ValidatorRequest};
use crate::types::{
    has_errors, AttributePath, Diagnostic, Dynamic, DynamicValue, RawState, ServerCapabilities,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Log level for the provider process
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a `TF_LOG` style level; anything unrecognized is `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TRACE" | "JSON" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn as_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Server configuration for hosting a provider
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Whether to install a tracing subscriber
    pub enable_logging: bool,
    /// Log level
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            log_level: LogLevel::Info,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the level taken from `TF_LOG` when it is set
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var("TF_LOG").ok().as_deref().and_then(LogLevel::parse) {
            Some(level) => config.with_log_level(level),
            None => config,
        }
    }

    /// Disable logging
    pub fn without_logging(mut self) -> Self {
        self.enable_logging = false;
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

/// Installs the stderr fmt subscriber; stdout belongs to the host
pub fn init_logging(config: &ServerConfig) {
    if !config.enable_logging {
        return;
    }
    let installed = tracing_subscriber::fmt()
        .with_max_level(config.log_level.as_tracing_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
}

pub struct GetMetadataResponse {
    pub type_name: String,
    pub server_capabilities: ServerCapabilities,
    pub resources: Vec<String>,
    pub data_sources: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct GetProviderSchemaResponse {
    pub provider: Schema,
    pub resource_schemas: HashMap<String, Schema>,
    pub data_source_schemas: HashMap<String, Schema>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct PlanResourceChangeRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
    pub config: DynamicValue,
    pub prior_private: Vec<u8>,
}

pub struct PlanResourceChangeResponse {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub planned_private: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ApplyResourceChangeRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
    pub planned_state: DynamicValue,
    pub config: DynamicValue,
    pub planned_private: Vec<u8>,
}

pub struct ApplyResourceChangeResponse {
    pub new_state: DynamicValue,
    pub private: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct UpgradeResourceStateRequest {
    pub type_name: String,
    pub version: i64,
    pub raw_state: RawState,
}

pub struct UpgradeResourceStateResponse {
    pub upgraded_state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

type ProviderData = Option<Arc<dyn Any + Send + Sync>>;

pub struct ProviderServer<P: Provider> {
    provider: Arc<RwLock<P>>,
    provider_data: Arc<RwLock<ProviderData>>,
    resources: HashMap<String, ResourceFactory>,
    data_sources: HashMap<String, DataSourceFactory>,
}

impl<P: Provider + 'static> ProviderServer<P> {
    pub fn new(provider: P) -> Self {
        let resources = provider.resources();
        let data_sources = provider.data_sources();
        Self {
            provider: Arc::new(RwLock::new(provider)),
            provider_data: Arc::new(RwLock::new(None)),
            resources,
            data_sources,
        }
    }

    /// Same as `new`, installing logging first
    pub fn with_config(provider: P, config: ServerConfig) -> Self {
        init_logging(&config);
        Self::new(provider)
    }

    pub async fn get_metadata(&self, ctx: Context) -> GetMetadataResponse {
        let provider = self.provider.read().await;
        let metadata = provider.metadata(ctx, ProviderMetadataRequest).await;

        let mut resources: Vec<String> = self.resources.keys().cloned().collect();
        resources.sort();
        let mut data_sources: Vec<String> = self.data_sources.keys().cloned().collect();
        data_sources.sort();

        GetMetadataResponse {
            type_name: metadata.type_name,
            server_capabilities: metadata.server_capabilities,
            resources,
            data_sources,
            diagnostics: vec![],
        }
    }

    pub async fn get_provider_schema(&self, ctx: Context) -> GetProviderSchemaResponse {
        let provider_schema = {
            let provider = self.provider.read().await;
            provider.schema(ctx.clone(), ProviderSchemaRequest).await
        };
        let mut diagnostics = provider_schema.diagnostics;

        let mut resource_schemas = HashMap::new();
        for (name, factory) in &self.resources {
            let response = factory().schema(ctx.clone(), ResourceSchemaRequest).await;
            diagnostics.extend(response.diagnostics);
            resource_schemas.insert(name.clone(), response.schema);
        }

        let mut data_source_schemas = HashMap::new();
        for (name, factory) in &self.data_sources {
            let response = factory().schema(ctx.clone(), DataSourceSchemaRequest).await;
            diagnostics.extend(response.diagnostics);
            data_source_schemas.insert(name.clone(), response.schema);
        }

        GetProviderSchemaResponse {
            provider: provider_schema.schema,
            resource_schemas,
            data_source_schemas,
            diagnostics,
        }
    }

    pub async fn validate_provider_config(
        &self,
        ctx: Context,
        config: DynamicValue,
    ) -> Vec<Diagnostic> {
        let provider = self.provider.read().await;
        let schema = provider.schema(ctx.clone(), ProviderSchemaRequest).await;

        let mut diagnostics = schema.diagnostics;
        validate_attributes(
            &schema.schema.block.attributes,
            &config.value,
            &AttributePath::root(),
            &mut diagnostics,
        );
        if has_errors(&diagnostics) {
            return diagnostics;
        }

        let response = provider
            .validate(ctx, ValidateProviderConfigRequest { config })
            .await;
        diagnostics.extend(response.diagnostics);
        diagnostics
    }

    pub async fn validate_resource_config(
        &self,
        ctx: Context,
        type_name: &str,
        config: DynamicValue,
    ) -> Vec<Diagnostic> {
        let Some(factory) = self.resources.get(type_name) else {
            return vec![TfplugError::ResourceNotFound(type_name.to_string()).into()];
        };
        let resource = factory();
        let schema = resource.schema(ctx.clone(), ResourceSchemaRequest).await;

        let mut diagnostics = schema.diagnostics;
        validate_attributes(
            &schema.schema.block.attributes,
            &config.value,
            &AttributePath::root(),
            &mut diagnostics,
        );
        if has_errors(&diagnostics) {
            return diagnostics;
        }

        let response = resource
            .validate(
                ctx,
                ValidateResourceConfigRequest {
                    type_name: type_name.to_string(),
                    config,
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);
        diagnostics
    }

    pub async fn validate_data_source_config(
        &self,
        ctx: Context,
        type_name: &str,
        config: DynamicValue,
    ) -> Vec<Diagnostic> {
        let Some(factory) = self.data_sources.get(type_name) else {
            return vec![TfplugError::DataSourceNotFound(type_name.to_string()).into()];
        };
        let data_source = factory();
        let schema = data_source.schema(ctx.clone(), DataSourceSchemaRequest).await;

        let mut diagnostics = schema.diagnostics;
        validate_attributes(
            &schema.schema.block.attributes,
            &config.value,
            &AttributePath::root(),
            &mut diagnostics,
        );
        if has_errors(&diagnostics) {
            return diagnostics;
        }

        let response = data_source
            .validate(
                ctx,
                ValidateDataSourceConfigRequest {
                    type_name: type_name.to_string(),
                    config,
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);
        diagnostics
    }

    pub async fn configure_provider(
        &self,
        ctx: Context,
        terraform_version: &str,
        config: DynamicValue,
    ) -> Vec<Diagnostic> {
        let mut provider = self.provider.write().await;
        let response = provider
            .configure(
                ctx,
                ConfigureProviderRequest {
                    terraform_version: terraform_version.to_string(),
                    config,
                },
            )
            .await;

        if has_errors(&response.diagnostics) {
            warn!("provider configuration failed");
            return response.diagnostics;
        }

        *self.provider_data.write().await = response.provider_data;
        debug!("provider configured");
        response.diagnostics
    }

    pub async fn plan_resource_change(
        &self,
        ctx: Context,
        request: PlanResourceChangeRequest,
    ) -> PlanResourceChangeResponse {
        debug!(type_name = %request.type_name, "planning resource change");

        // Null config means the resource is being destroyed
        if request.config.is_null() {
            return PlanResourceChangeResponse {
                planned_state: DynamicValue::null(),
                requires_replace: vec![],
                planned_private: request.prior_private,
                diagnostics: vec![],
            };
        }

        let Some(factory) = self.resources.get(&request.type_name) else {
            return PlanResourceChangeResponse {
                planned_state: request.prior_state,
                requires_replace: vec![],
                planned_private: request.prior_private,
                diagnostics: vec![TfplugError::ResourceNotFound(request.type_name).into()],
            };
        };
        let schema = factory().schema(ctx, ResourceSchemaRequest).await;
        let attributes = &schema.schema.block.attributes;

        let creating = request.prior_state.is_null();
        let config = &request.config.value;
        let prior = &request.prior_state.value;

        let mut planned = propose_object(attributes, config, prior);
        if creating || planned != *prior {
            mark_unset_computed_unknown(attributes, config, &mut planned);
        }

        let mut requires_replace = Vec::new();
        let mut diagnostics = schema.diagnostics;
        modify_attributes(
            attributes,
            config,
            prior,
            &mut planned,
            &AttributePath::root(),
            creating,
            &mut requires_replace,
            &mut diagnostics,
        );

        PlanResourceChangeResponse {
            planned_state: DynamicValue::new(planned),
            requires_replace,
            planned_private: request.prior_private,
            diagnostics,
        }
    }

    pub async fn apply_resource_change(
        &self,
        ctx: Context,
        request: ApplyResourceChangeRequest,
    ) -> ApplyResourceChangeResponse {
        let resource = match self.resource(ctx.clone(), &request.type_name).await {
            Ok(resource) => resource,
            Err(diagnostics) => {
                return ApplyResourceChangeResponse {
                    new_state: request.prior_state,
                    private: request.planned_private,
                    diagnostics,
                }
            }
        };

        match (request.prior_state.is_null(), request.planned_state.is_null()) {
            (true, true) => ApplyResourceChangeResponse {
                new_state: DynamicValue::null(),
                private: vec![],
                diagnostics: vec![],
            },
            (true, false) => {
                debug!(type_name = %request.type_name, "creating resource");
                let response = resource
                    .create(
                        ctx,
                        CreateResourceRequest {
                            type_name: request.type_name,
                            planned_state: request.planned_state,
                            config: request.config,
                            planned_private: request.planned_private,
                        },
                    )
                    .await;
                checked_apply(response.new_state, response.private, response.diagnostics)
            }
            (false, true) => {
                debug!(type_name = %request.type_name, "deleting resource");
                let response = resource
                    .delete(
                        ctx,
                        DeleteResourceRequest {
                            type_name: request.type_name,
                            prior_state: request.prior_state.clone(),
                            planned_private: request.planned_private.clone(),
                        },
                    )
                    .await;
                if has_errors(&response.diagnostics) {
                    return ApplyResourceChangeResponse {
                        new_state: request.prior_state,
                        private: request.planned_private,
                        diagnostics: response.diagnostics,
                    };
                }
                ApplyResourceChangeResponse {
                    new_state: DynamicValue::null(),
                    private: vec![],
                    diagnostics: response.diagnostics,
                }
            }
            (false, false) => {
                debug!(type_name = %request.type_name, "updating resource");
                let prior_state = request.prior_state.clone();
                let response = resource
                    .update(
                        ctx,
                        UpdateResourceRequest {
                            type_name: request.type_name,
                            prior_state: request.prior_state,
                            planned_state: request.planned_state,
                            config: request.config,
                            planned_private: request.planned_private,
                        },
                    )
                    .await;
                if has_errors(&response.diagnostics) && response.new_state.is_null() {
                    return ApplyResourceChangeResponse {
                        new_state: prior_state,
                        private: response.private,
                        diagnostics: response.diagnostics,
                    };
                }
                checked_apply(response.new_state, response.private, response.diagnostics)
            }
        }
    }

    pub async fn read_resource(
        &self,
        ctx: Context,
        request: ReadResourceRequest,
    ) -> ReadResourceResponse {
        let resource = match self.resource(ctx.clone(), &request.type_name).await {
            Ok(resource) => resource,
            Err(diagnostics) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                }
            }
        };
        resource.read(ctx, request).await
    }

    pub async fn import_resource_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        match self.resource(ctx.clone(), &request.type_name).await {
            Ok(resource) => resource.import_state(ctx, request).await,
            Err(diagnostics) => ImportResourceStateResponse {
                imported_resources: vec![],
                diagnostics,
            },
        }
    }

    pub async fn read_data_source(
        &self,
        ctx: Context,
        request: ReadDataSourceRequest,
    ) -> ReadDataSourceResponse {
        let data_source = match self.data_source(ctx.clone(), &request.type_name).await {
            Ok(data_source) => data_source,
            Err(diagnostics) => {
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                }
            }
        };

        let schema = data_source.schema(ctx.clone(), DataSourceSchemaRequest).await;
        let mut diagnostics = schema.diagnostics;
        validate_attributes(
            &schema.schema.block.attributes,
            &request.config.value,
            &AttributePath::root(),
            &mut diagnostics,
        );
        if has_errors(&diagnostics) {
            return ReadDataSourceResponse {
                state: DynamicValue::null(),
                diagnostics,
            };
        }

        let mut response = data_source.read(ctx, request).await;
        diagnostics.append(&mut response.diagnostics);
        response.diagnostics = diagnostics;
        response
    }

    pub async fn upgrade_resource_state(
        &self,
        ctx: Context,
        request: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse {
        let Some(factory) = self.resources.get(&request.type_name) else {
            return UpgradeResourceStateResponse {
                upgraded_state: DynamicValue::null(),
                diagnostics: vec![TfplugError::ResourceNotFound(request.type_name).into()],
            };
        };
        let schema = factory().schema(ctx, ResourceSchemaRequest).await.schema;

        if request.version != schema.version {
            let error = TfplugError::UpgradeFailed(format!(
                "{} has no upgrade from schema version {} to {}",
                request.type_name, request.version, schema.version
            ));
            return UpgradeResourceStateResponse {
                upgraded_state: DynamicValue::null(),
                diagnostics: vec![error.into()],
            };
        }

        let Some(json) = request.raw_state.json else {
            return UpgradeResourceStateResponse {
                upgraded_state: DynamicValue::null(),
                diagnostics: vec![],
            };
        };

        match DynamicValue::decode_json(&json) {
            Ok(upgraded_state) => UpgradeResourceStateResponse {
                upgraded_state,
                diagnostics: vec![],
            },
            Err(e) => UpgradeResourceStateResponse {
                upgraded_state: DynamicValue::null(),
                diagnostics: vec![e.into()],
            },
        }
    }

    async fn resource(
        &self,
        ctx: Context,
        type_name: &str,
    ) -> std::result::Result<Box<dyn ManagedResource>, Vec<Diagnostic>> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| vec![TfplugError::ResourceNotFound(type_name.to_string()).into()])?;

        let mut resource = factory();
        let provider_data = self.provider_data.read().await.clone();
        let response = resource
            .configure(ctx, ConfigureResourceRequest { provider_data })
            .await;
        if has_errors(&response.diagnostics) {
            return Err(response.diagnostics);
        }
        Ok(resource)
    }

    async fn data_source(
        &self,
        ctx: Context,
        type_name: &str,
    ) -> std::result::Result<Box<dyn DataSourceWithConfigure>, Vec<Diagnostic>> {
        let factory = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| vec![TfplugError::DataSourceNotFound(type_name.to_string()).into()])?;

        let mut data_source = factory();
        let provider_data = self.provider_data.read().await.clone();
        let response = data_source
            .configure(ctx, ConfigureDataSourceRequest { provider_data })
            .await;
        if has_errors(&response.diagnostics) {
            return Err(response.diagnostics);
        }
        Ok(data_source)
    }
}

fn checked_apply(
    new_state: DynamicValue,
    private: Vec<u8>,
    mut diagnostics: Vec<Diagnostic>,
) -> ApplyResourceChangeResponse {
    if !has_errors(&diagnostics) && new_state.value.contains_unknown() {
        diagnostics.push(Diagnostic::error(
            "Provider returned invalid result object after apply",
            "After the apply operation, the provider still indicated an unknown value. \
             All values must be known after apply.",
        ));
    }
    ApplyResourceChangeResponse {
        new_state,
        private,
        diagnostics,
    }
}

fn validate_attributes(
    attributes: &[Attribute],
    value: &Dynamic,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Dynamic::Map(entries) = value else {
        return;
    };

    let mut unsupported: Vec<&String> = entries
        .keys()
        .filter(|key| !attributes.iter().any(|a| &a.name == *key))
        .collect();
    unsupported.sort();
    for key in unsupported {
        diagnostics.push(
            Diagnostic::error(
                "Unsupported argument",
                format!("An argument named {:?} is not expected here.", key),
            )
            .with_attribute(path.clone().attribute(key)),
        );
    }

    for attr in attributes {
        let attr_path = path.clone().attribute(&attr.name);
        let attr_value = value.attr(&attr.name);

        if attr.required && attr_value.is_null() {
            diagnostics.push(
                Diagnostic::error(
                    "Missing required argument",
                    format!("The argument {:?} is required, but no definition was found.", attr.name),
                )
                .with_attribute(attr_path),
            );
            continue;
        }

        if attr.computed && !attr.optional && !attr.required && !attr_value.is_null() {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid Configuration for Read-Only Attribute",
                    format!("Cannot set value for attribute {:?}, it is computed only.", attr.name),
                )
                .with_attribute(attr_path),
            );
            continue;
        }

        let shape_ok = match &attr.nested_type {
            Some(nested) if nested.nesting == ObjectNestingMode::Single => {
                !attr_value.is_known() || attr_value.as_map().is_some()
            }
            Some(_) => !attr_value.is_known() || attr_value.as_list().is_some(),
            None => attr.r#type.accepts(attr_value),
        };
        if !shape_ok {
            diagnostics.push(
                Diagnostic::error(
                    "Incorrect attribute value type",
                    format!(
                        "Inappropriate value for attribute {:?}: got {}.",
                        attr.name,
                        attr_value.type_name()
                    ),
                )
                .with_attribute(attr_path),
            );
            continue;
        }

        for validator in &attr.validators {
            let response = validator.validate(ValidatorRequest {
                config_value: DynamicValue::new(attr_value.clone()),
                path: attr_path.clone(),
            });
            diagnostics.extend(response.diagnostics);
        }

        if let Some(nested) = &attr.nested_type {
            match nested.nesting {
                ObjectNestingMode::Single => {
                    validate_attributes(&nested.attributes, attr_value, &attr_path, diagnostics)
                }
                ObjectNestingMode::List => {
                    for (i, element) in attr_value.as_list().into_iter().flatten().enumerate() {
                        validate_attributes(
                            &nested.attributes,
                            element,
                            &attr_path.clone().index(i as i64),
                            diagnostics,
                        );
                    }
                }
            }
        }
    }
}

/// Config values, with prior values kept for unset computed attributes
fn propose_object(attributes: &[Attribute], config: &Dynamic, prior: &Dynamic) -> Dynamic {
    let mut entries = HashMap::new();
    for attr in attributes {
        let config_value = config.attr(&attr.name);
        let prior_value = prior.attr(&attr.name);
        let proposed = match attr.single_nested_attributes() {
            Some(nested) if config_value.is_known() => {
                propose_object(nested, config_value, prior_value)
            }
            _ if config_value.is_null() && attr.computed => prior_value.clone(),
            _ => config_value.clone(),
        };
        entries.insert(attr.name.clone(), proposed);
    }
    Dynamic::Map(entries)
}

fn mark_unset_computed_unknown(attributes: &[Attribute], config: &Dynamic, planned: &mut Dynamic) {
    let Dynamic::Map(entries) = planned else {
        return;
    };
    for attr in attributes {
        let config_value = config.attr(&attr.name);
        let Some(value) = entries.get_mut(&attr.name) else {
            continue;
        };
        if attr.computed && config_value.is_null() {
            *value = Dynamic::Unknown;
        } else if let Some(nested) = attr.single_nested_attributes() {
            mark_unset_computed_unknown(nested, config_value, value);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn modify_attributes(
    attributes: &[Attribute],
    config: &Dynamic,
    prior: &Dynamic,
    planned: &mut Dynamic,
    path: &AttributePath,
    creating: bool,
    requires_replace: &mut Vec<AttributePath>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Dynamic::Map(entries) = planned else {
        return;
    };
    for attr in attributes {
        let attr_path = path.clone().attribute(&attr.name);
        let config_value = config.attr(&attr.name);
        let prior_value = prior.attr(&attr.name);
        let mut value = entries.remove(&attr.name).unwrap_or(Dynamic::Null);

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify(PlanModifierRequest {
                config_value: DynamicValue::new(config_value.clone()),
                state_value: DynamicValue::new(prior_value.clone()),
                plan_value: DynamicValue::new(value),
                path: attr_path.clone(),
                creating,
            });
            value = response.plan_value.value;
            if response.requires_replace && !creating && !requires_replace.contains(&attr_path) {
                requires_replace.push(attr_path.clone());
            }
            diagnostics.extend(response.diagnostics);
        }

        if let Some(nested) = attr.single_nested_attributes() {
            modify_attributes(
                nested,
                config_value,
                prior_value,
                &mut value,
                &attr_path,
                creating,
                requires_replace,
                diagnostics,
            );
        }

        entries.insert(attr.name.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_tf_log_values() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("JSON"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse(" warn "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn server_config_builders() {
        let config = ServerConfig::new()
            .without_logging()
            .with_log_level(LogLevel::Error);
        assert!(!config.enable_logging);
        assert_eq!(config.log_level, LogLevel::Error);
    }
}
