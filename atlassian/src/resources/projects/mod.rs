//! Project category resource

pub mod resource_project_category;

pub use resource_project_category::ProjectCategoryResource;
