//! Field configuration, field configuration scheme and mapping resources

pub mod resource_field_configuration;
pub mod resource_field_configuration_item;
pub mod resource_field_configuration_scheme;
pub mod resource_field_configuration_scheme_mapping;

pub use resource_field_configuration::FieldConfigurationResource;
pub use resource_field_configuration_item::FieldConfigurationItemResource;
pub use resource_field_configuration_scheme::FieldConfigurationSchemeResource;
pub use resource_field_configuration_scheme_mapping::FieldConfigurationSchemeMappingResource;
