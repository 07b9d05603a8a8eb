//! Group and group membership resources

pub mod resource_group;
pub mod resource_group_user;

pub use resource_group::GroupResource;
pub use resource_group_user::GroupUserResource;
