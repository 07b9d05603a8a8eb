//! tfplug - Terraform Plugin Framework for Rust
//!
//! A framework for building Terraform providers in Rust: schemas, values,
//! validators, plan modifiers and the resource/data source/provider traits,
//! hosted in-process by `ProviderServer`.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;
pub mod plan_modifier;
pub mod validator;

// Host
pub mod server;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use import::{import_state_attributes, import_state_passthrough_id};
pub use provider::{DataSourceFactory, Provider, ResourceFactory};
pub use resource::{ManagedResource, Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use server::{init_logging, LogLevel, ProviderServer, ServerConfig};
pub use types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
