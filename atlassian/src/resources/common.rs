//! Helpers shared by resource and data source handlers

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use tfplug::context::Context;
use tfplug::plan_modifier::{DefaultValue, UseStateForUnknown};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::StringLengthBetween;

use crate::api::ApiError;
use crate::AtlassianProviderData;

/// Separator of composite ids kept in state
pub const ID_SEPARATOR: &str = "-";

/// Separator of composite ids given to `import`
pub const IMPORT_SEPARATOR: &str = ",";

/// "Client Error" diagnostic for a failed REST call, carrying the response body when there is one
pub fn client_error(verb: &str, entity: &str, err: &ApiError) -> Diagnostic {
    let mut detail = format!("Unable to {} {}, got error: {}", verb, entity, err);
    if let Some(body) = err.body() {
        detail.push_str(&format!("\nResponse body: {}", body));
    }
    Diagnostic::error("Client Error", detail)
}

pub fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "The provider has not been configured with Atlassian credentials",
    )
}

/// Awaits a REST call unless the host cancels first
pub async fn call<T, F>(ctx: &Context, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    ctx.run(fut).await.unwrap_or(Err(ApiError::Cancelled))
}

pub fn composite_id<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(ID_SEPARATOR)
}

/// Splits an import identifier into exactly `names.len()` non-empty parts
pub fn parse_import_id(id: &str, names: &[&str]) -> Result<Vec<String>, Diagnostic> {
    let parts: Vec<&str> = id.split(IMPORT_SEPARATOR).collect();
    if parts.len() != names.len() || parts.iter().any(|p| p.is_empty()) {
        return Err(Diagnostic::error(
            "Unexpected Import Identifier",
            format!(
                "Expected import identifier with format: {}. Got: {:?}",
                names.join(IMPORT_SEPARATOR),
                id
            ),
        ));
    }
    Ok(parts.into_iter().map(str::to_string).collect())
}

/// Which kind of handler is receiving provider data
#[derive(Debug, Clone, Copy)]
pub enum HandlerKind {
    Resource,
    DataSource,
}

/// Extracts the client handed out by provider configure
///
/// No data at all is not an error: the host calls configure on handlers before the
/// provider itself is configured.
pub fn configure_provider_data(
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
    kind: HandlerKind,
) -> (Option<AtlassianProviderData>, Vec<Diagnostic>) {
    let Some(data) = provider_data else {
        return (None, vec![]);
    };

    match data.downcast_ref::<AtlassianProviderData>() {
        Some(provider_data) => (Some(provider_data.clone()), vec![]),
        None => {
            let summary = match kind {
                HandlerKind::Resource => "Unexpected Resource Configure Type",
                HandlerKind::DataSource => "Unexpected Data Source Configure Type",
            };
            (
                None,
                vec![Diagnostic::error(
                    summary,
                    "Expected AtlassianProviderData. Please report this issue to the provider developers.",
                )],
            )
        }
    }
}

/// Known string at a top-level attribute
pub fn string_attr(value: &DynamicValue, name: &str) -> Option<String> {
    value.get_string(&AttributePath::new(name)).ok()
}

/// Known number at a top-level attribute, as an integer
pub fn int_attr(value: &DynamicValue, name: &str) -> Option<i64> {
    value
        .get_number(&AttributePath::new(name))
        .ok()
        .map(|n| n as i64)
}

/// Known bool at a top-level attribute
pub fn bool_attr(value: &DynamicValue, name: &str) -> Option<bool> {
    value.get_bool(&AttributePath::new(name)).ok()
}

/// Known strings of a list attribute
pub fn string_list_attr(value: &DynamicValue, name: &str) -> Vec<String> {
    value
        .get_string_list(&AttributePath::new(name))
        .unwrap_or_default()
}

/// Non-empty description, or None so the remote keeps its own default
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

pub fn state_of<I, K>(entries: I) -> DynamicValue
where
    I: IntoIterator<Item = (K, Dynamic)>,
    K: Into<String>,
{
    DynamicValue::new(Dynamic::object(entries))
}

/// Fills unknown top-level values of `planned` from `prior`
pub fn carry_unknown(planned: &DynamicValue, prior: &DynamicValue) -> DynamicValue {
    let mut carried = planned.clone();
    if let (Dynamic::Map(entries), Dynamic::Map(prior_entries)) = (&mut carried.value, &prior.value)
    {
        for (name, value) in entries.iter_mut() {
            if value.is_unknown() {
                *value = prior_entries.get(name).cloned().unwrap_or(Dynamic::Null);
            }
        }
    }
    carried
}

/// Orders `remote` like `prior`, with entries unknown to `prior` appended in remote order
pub fn reconcile_order<T: PartialEq + Clone>(prior: &[T], remote: &[T]) -> Vec<T> {
    let mut ordered: Vec<T> = prior.iter().filter(|p| remote.contains(p)).cloned().collect();
    for item in remote {
        if !ordered.contains(item) {
            ordered.push(item.clone());
        }
    }
    ordered
}

pub fn id_attribute(description: &str) -> Attribute {
    AttributeBuilder::new("id", AttributeType::String)
        .description(description)
        .computed()
        .plan_modifier(UseStateForUnknown::create())
        .build()
}

/// Computed `self` URL that survives plans unchanged
pub fn self_attribute(description: &str) -> Attribute {
    AttributeBuilder::new("self", AttributeType::String)
        .description(description)
        .computed()
        .plan_modifier(UseStateForUnknown::create())
        .build()
}

/// Required `name` limited to `max` characters
pub fn name_attribute(description: &str, max: usize) -> Attribute {
    AttributeBuilder::new("name", AttributeType::String)
        .description(description)
        .required()
        .validator(StringLengthBetween::new(1, max))
        .build()
}

/// Optional `description` that defaults to `default` and is limited to `max` characters
pub fn description_attribute(description: &str, default: &str, max: usize) -> Attribute {
    AttributeBuilder::new("description", AttributeType::String)
        .description(description)
        .optional()
        .computed()
        .validator(StringLengthBetween::new(0, max))
        .plan_modifier(DefaultValue::string(default))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_id_joins_with_hyphen() {
        assert_eq!(composite_id(&["jira-admins", "5b10ac"]), "jira-admins-5b10ac");
    }

    #[test]
    fn parse_import_id_requires_exact_arity() {
        assert_eq!(
            parse_import_id("10,20,default", &["scheme_id", "config_id", "issue_type_id"]).unwrap(),
            vec!["10", "20", "default"]
        );

        let err = parse_import_id("10,20", &["scheme_id", "config_id", "issue_type_id"]).unwrap_err();
        assert_eq!(err.summary, "Unexpected Import Identifier");
        assert!(err
            .detail
            .contains("scheme_id,config_id,issue_type_id"));

        let err = parse_import_id("group,", &["group_name", "account_id"]).unwrap_err();
        assert!(err.detail.contains("\"group,\""));
    }

    #[test]
    fn client_error_includes_body() {
        let err = ApiError::ApiError {
            status: 400,
            message: "name: taken".to_string(),
            body: r#"{"errors":{"name":"taken"}}"#.to_string(),
        };
        let diag = client_error("create", "group", &err);
        assert_eq!(diag.summary, "Client Error");
        assert!(diag.detail.starts_with("Unable to create group, got error: "));
        assert!(diag.detail.contains(r#"{"errors":{"name":"taken"}}"#));
    }

    #[test]
    fn configure_rejects_foreign_provider_data() {
        let (data, diags) = configure_provider_data(None, HandlerKind::Resource);
        assert!(data.is_none());
        assert!(diags.is_empty());

        let foreign: Arc<dyn Any + Send + Sync> = Arc::new(42u8);
        let (data, diags) = configure_provider_data(Some(foreign), HandlerKind::DataSource);
        assert!(data.is_none());
        assert_eq!(diags[0].summary, "Unexpected Data Source Configure Type");
    }

    #[test]
    fn reconcile_order_keeps_prior_order() {
        let prior = vec!["b", "a", "gone"];
        let remote = vec!["a", "c", "b"];
        assert_eq!(reconcile_order(&prior, &remote), vec!["b", "a", "c"]);
    }

    #[test]
    fn carry_unknown_takes_prior_values() {
        let planned = state_of([("id", Dynamic::Unknown), ("name", Dynamic::from("new"))]);
        let prior = state_of([("id", Dynamic::from("1")), ("name", Dynamic::from("old"))]);
        let carried = carry_unknown(&planned, &prior);
        assert_eq!(string_attr(&carried, "id").as_deref(), Some("1"));
        assert_eq!(string_attr(&carried, "name").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn call_reports_cancellation() {
        let ctx = Context::new();
        ctx.cancel();
        let result: Result<(), ApiError> = call(&ctx, std::future::pending()).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
