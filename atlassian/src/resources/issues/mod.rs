//! Issue type, screen and scheme resources

pub mod resource_issue_screen;
pub mod resource_issue_type;
pub mod resource_issue_type_scheme;
pub mod resource_issue_type_screen_scheme;
pub mod resource_screen_scheme;

pub use resource_issue_screen::IssueScreenResource;
pub use resource_issue_type::IssueTypeResource;
pub use resource_issue_type_scheme::IssueTypeSchemeResource;
pub use resource_issue_type_screen_scheme::IssueTypeScreenSchemeResource;
pub use resource_screen_scheme::ScreenSchemeResource;
