//! Data source implementations
//!
//! Each data source is a read-only projection of a Jira object. A missing target is a
//! client error rather than an empty result.

pub mod data_source_group;
pub mod data_source_issue_field_configuration;
pub mod data_source_issue_field_configuration_scheme;
pub mod data_source_issue_screen;
pub mod data_source_issue_type;
pub mod data_source_issue_type_scheme;
pub mod data_source_issue_type_screen_scheme;
pub mod data_source_myself;
pub mod data_source_permission_scheme;
pub mod data_source_project_category;
pub mod data_source_screen_scheme;
pub mod data_source_server_info;
pub mod data_source_status;

pub use data_source_group::GroupDataSource;
pub use data_source_issue_field_configuration::FieldConfigurationDataSource;
pub use data_source_issue_field_configuration_scheme::FieldConfigurationSchemeDataSource;
pub use data_source_issue_screen::IssueScreenDataSource;
pub use data_source_issue_type::IssueTypeDataSource;
pub use data_source_issue_type_scheme::IssueTypeSchemeDataSource;
pub use data_source_issue_type_screen_scheme::IssueTypeScreenSchemeDataSource;
pub use data_source_myself::MyselfDataSource;
pub use data_source_permission_scheme::PermissionSchemeDataSource;
pub use data_source_project_category::ProjectCategoryDataSource;
pub use data_source_screen_scheme::ScreenSchemeDataSource;
pub use data_source_server_info::ServerInfoDataSource;
pub use data_source_status::StatusDataSource;

use tfplug::schema::{Attribute, AttributeBuilder, AttributeType};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use crate::resources::common::string_attr;

/// Required string used to look the target up
pub(crate) fn lookup_attribute(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .required()
        .build()
}

pub(crate) fn computed_attribute(name: &str, kind: AttributeType, description: &str) -> Attribute {
    AttributeBuilder::new(name, kind)
        .description(description)
        .computed()
        .build()
}

/// Turns resource attributes into computed-only attributes, nested ones included
pub(crate) fn read_only(attributes: Vec<Attribute>) -> Vec<Attribute> {
    attributes
        .into_iter()
        .map(|mut attr| {
            attr.required = false;
            attr.optional = false;
            attr.computed = true;
            attr.validators.clear();
            attr.plan_modifiers.clear();
            if let Some(nested) = attr.nested_type.as_mut() {
                nested.attributes = read_only(std::mem::take(&mut nested.attributes));
            }
            attr
        })
        .collect()
}

/// The configured lookup key
pub(crate) fn lookup_value(config: &DynamicValue, name: &str) -> Result<String, Diagnostic> {
    string_attr(config, name).ok_or_else(|| {
        Diagnostic::error(
            "Missing lookup attribute",
            format!("The {:?} attribute must be set to a known value", name),
        )
        .with_attribute(AttributePath::new(name))
    })
}

pub(crate) fn not_found(entity: &str, key: &str) -> Diagnostic {
    Diagnostic::error(
        "Client Error",
        format!("Unable to read {}, got error: {} {:?} not found", entity, entity, key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfplug::plan_modifier::DefaultValue;
    use tfplug::validator::StringValues;

    #[test]
    fn read_only_strips_configurability() {
        let nested = AttributeBuilder::single_nested(
            "scope",
            vec![AttributeBuilder::new("type", AttributeType::String)
                .required()
                .validator(StringValues::new(&["GLOBAL", "PROJECT"]))
                .build()],
        )
        .required()
        .plan_modifier(DefaultValue::string("x"))
        .build();

        let converted = read_only(vec![nested]);
        assert!(converted[0].computed && !converted[0].required);
        assert!(converted[0].plan_modifiers.is_empty());
        let inner = &converted[0].single_nested_attributes().unwrap()[0];
        assert!(inner.computed && !inner.required && !inner.optional);
        assert!(inner.validators.is_empty());
    }

    #[test]
    fn not_found_is_client_error() {
        let diag = not_found("status", "10005");
        assert_eq!(diag.summary, "Client Error");
        assert!(diag.detail.contains("\"10005\" not found"));
    }
}
