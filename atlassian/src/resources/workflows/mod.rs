//! Workflow status resource

pub mod resource_status;

pub use resource_status::StatusResource;
