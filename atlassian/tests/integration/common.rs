use atlassian::AtlassianProvider;
use tfplug::context::Context;
use tfplug::resource::{ImportResourceStateRequest, ReadResourceRequest};
use tfplug::server::{
    ApplyResourceChangeRequest, PlanResourceChangeRequest, PlanResourceChangeResponse,
    ProviderServer, ServerConfig,
};
use tfplug::types::{has_errors, AttributePath, Diagnostic, Dynamic, DynamicValue};

pub type Host = ProviderServer<AtlassianProvider>;

pub fn object<const N: usize>(entries: [(&str, Dynamic); N]) -> DynamicValue {
    DynamicValue::new(Dynamic::object(entries))
}

/// Host with the provider configured against `url`
pub async fn host(url: &str) -> Host {
    let host = ProviderServer::with_config(
        AtlassianProvider::new(),
        ServerConfig::new().without_logging(),
    );
    let diagnostics = host
        .configure_provider(
            Context::new(),
            "1.9.0",
            object([
                ("url", Dynamic::from(url)),
                ("username", Dynamic::from("admin@example.com")),
                ("apitoken", Dynamic::from("secret")),
            ]),
        )
        .await;
    assert!(!has_errors(&diagnostics), "{:?}", diagnostics);
    host
}

pub async fn plan(
    host: &Host,
    type_name: &str,
    prior: &DynamicValue,
    config: &DynamicValue,
) -> PlanResourceChangeResponse {
    let diagnostics = host
        .validate_resource_config(Context::new(), type_name, config.clone())
        .await;
    assert!(!has_errors(&diagnostics), "{:?}", diagnostics);

    let response = host
        .plan_resource_change(
            Context::new(),
            PlanResourceChangeRequest {
                type_name: type_name.to_string(),
                prior_state: prior.clone(),
                config: config.clone(),
                prior_private: vec![],
            },
        )
        .await;
    assert!(!has_errors(&response.diagnostics), "{:?}", response.diagnostics);
    response
}

/// Plans and applies `config` on top of `prior`, returning the new state
pub async fn apply(
    host: &Host,
    type_name: &str,
    prior: &DynamicValue,
    config: &DynamicValue,
) -> DynamicValue {
    let planned = plan(host, type_name, prior, config).await;
    let response = host
        .apply_resource_change(
            Context::new(),
            ApplyResourceChangeRequest {
                type_name: type_name.to_string(),
                prior_state: prior.clone(),
                planned_state: planned.planned_state,
                config: config.clone(),
                planned_private: planned.planned_private,
            },
        )
        .await;
    assert!(!has_errors(&response.diagnostics), "{:?}", response.diagnostics);
    response.new_state
}

/// Destroys `prior`, returning the diagnostics of the delete
pub async fn destroy(host: &Host, type_name: &str, prior: &DynamicValue) -> Vec<Diagnostic> {
    let response = host
        .apply_resource_change(
            Context::new(),
            ApplyResourceChangeRequest {
                type_name: type_name.to_string(),
                prior_state: prior.clone(),
                planned_state: DynamicValue::null(),
                config: DynamicValue::null(),
                planned_private: vec![],
            },
        )
        .await;
    assert!(response.new_state.is_null() || has_errors(&response.diagnostics));
    response.diagnostics
}

/// Refreshes `state`; None means the object is gone
pub async fn read(host: &Host, type_name: &str, state: &DynamicValue) -> Option<DynamicValue> {
    let response = host
        .read_resource(
            Context::new(),
            ReadResourceRequest {
                type_name: type_name.to_string(),
                current_state: state.clone(),
                private: vec![],
            },
        )
        .await;
    assert!(!has_errors(&response.diagnostics), "{:?}", response.diagnostics);
    response.new_state
}

pub async fn import(host: &Host, type_name: &str, id: &str) -> DynamicValue {
    let mut response = host
        .import_resource_state(
            Context::new(),
            ImportResourceStateRequest {
                type_name: type_name.to_string(),
                id: id.to_string(),
            },
        )
        .await;
    assert!(!has_errors(&response.diagnostics), "{:?}", response.diagnostics);
    assert_eq!(response.imported_resources.len(), 1);
    response.imported_resources.remove(0).state
}

pub fn string(state: &DynamicValue, name: &str) -> String {
    state
        .get_string(&AttributePath::new(name))
        .unwrap_or_else(|e| panic!("{} is not a string: {}", name, e))
}
