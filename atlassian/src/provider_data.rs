//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AtlassianProviderData {
    pub client: Arc<Client>,
}

impl AtlassianProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}
