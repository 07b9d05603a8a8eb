//! Test helpers for resource and data source handlers

use std::any::Any;
use std::sync::Arc;

use tfplug::context::Context;
use tfplug::data_source::{ConfigureDataSourceRequest, DataSourceWithConfigure};
use tfplug::resource::{ConfigureResourceRequest, ResourceWithConfigure};

use crate::api::test_helpers::create_test_client;
use crate::AtlassianProviderData;

pub fn provider_data(url: &str) -> Arc<dyn Any + Send + Sync> {
    Arc::new(AtlassianProviderData::new(create_test_client(url)))
}

/// Resource configured against a mock server
pub async fn configured_resource<R: ResourceWithConfigure + Default>(url: &str) -> R {
    let mut resource = R::default();
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(provider_data(url)),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    resource
}

/// Data source configured against a mock server
pub async fn configured_data_source<D: DataSourceWithConfigure + Default>(url: &str) -> D {
    let mut data_source = D::default();
    let response = data_source
        .configure(
            Context::new(),
            ConfigureDataSourceRequest {
                provider_data: Some(provider_data(url)),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    data_source
}
