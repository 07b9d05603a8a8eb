//! End-to-end tests driving the provider through the in-process host

mod common;
mod fields_test;
mod groups_test;
mod issues_test;
mod permissions_test;
mod workflows_test;
