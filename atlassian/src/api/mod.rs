//! Jira Cloud REST API v3 client

pub mod client;
pub mod common;
pub mod error;

pub mod field_configuration_schemes;
pub mod field_configurations;
pub mod groups;
pub mod issue_type_schemes;
pub mod issue_type_screen_schemes;
pub mod issue_types;
pub mod permission_schemes;
pub mod project_categories;
pub mod screen_schemes;
pub mod screens;
pub mod statuses;
pub mod system;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::{Client, ClientConfig};
pub use common::{ApiQueryParams, PageBean, PaginationParams};
pub use error::ApiError;
