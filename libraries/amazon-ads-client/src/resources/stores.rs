//! Amazon Stores.

use crate::client::AdsClient;
use crate::error::Result;
use crate::request::ApiPath;
use serde_json::Value;

/// Stores resource (`v2/stores`).
pub struct Stores<'a> {
    client: &'a AdsClient,
    base: ApiPath,
}

impl<'a> Stores<'a> {
    pub const BASE_PATH: &'static str = "v2/stores";

    pub(crate) fn new(client: &'a AdsClient) -> Self {
        Self::with_base_path(client, Self::BASE_PATH)
    }

    pub fn with_base_path(client: &'a AdsClient, base: impl Into<ApiPath>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }

    pub async fn list(&self) -> Result<Value> {
        self.client.get(self.base.clone(), None).await
    }

    pub async fn get(&self, brand_entity_id: &str) -> Result<Value> {
        self.client.get(self.base.child(brand_entity_id), None).await
    }
}
