//! Permission scheme and permission grant resources

pub mod resource_permission_grant;
pub mod resource_permission_scheme;

pub use resource_permission_grant::PermissionGrantResource;
pub use resource_permission_scheme::PermissionSchemeResource;
