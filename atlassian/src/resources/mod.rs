//! Resource implementations, grouped by Jira area

pub mod common;
pub mod fields;
pub mod groups;
pub mod issues;
pub mod permissions;
pub mod projects;
pub mod workflows;

#[cfg(test)]
pub mod test_helpers;

pub use fields::{
    FieldConfigurationItemResource, FieldConfigurationResource,
    FieldConfigurationSchemeMappingResource, FieldConfigurationSchemeResource,
};
pub use groups::{GroupResource, GroupUserResource};
pub use issues::{
    IssueScreenResource, IssueTypeResource, IssueTypeSchemeResource,
    IssueTypeScreenSchemeResource, ScreenSchemeResource,
};
pub use permissions::{PermissionGrantResource, PermissionSchemeResource};
pub use projects::ProjectCategoryResource;
pub use workflows::StatusResource;
