//! Advertiser profiles.

use super::to_body;
use crate::client::AdsClient;
use crate::error::Result;
use crate::request::{ApiPath, ApiRequest};
use crate::types::{Profile, ProfileUpdate, ProfileUpdateResult};
use serde_json::{json, Value};
use tracing::debug;

/// Profiles resource (`v2/profiles`).
pub struct Profiles<'a> {
    client: &'a AdsClient,
    base: ApiPath,
}

impl<'a> Profiles<'a> {
    pub const BASE_PATH: &'static str = "v2/profiles";

    pub(crate) fn new(client: &'a AdsClient) -> Self {
        Self::with_base_path(client, Self::BASE_PATH)
    }

    pub fn with_base_path(client: &'a AdsClient, base: impl Into<ApiPath>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }

    /// List every profile the credentials can access.
    ///
    /// Sent without the scope header, since profiles are what requests get
    /// scoped to.
    pub async fn all(&self) -> Result<Vec<Profile>> {
        let profiles: Vec<Profile> = self
            .client
            .execute(ApiRequest::get(self.base.clone()).unscoped())
            .await?;
        debug!(count = profiles.len(), "Fetched profiles");
        Ok(profiles)
    }

    pub async fn get(&self, profile_id: &str) -> Result<Profile> {
        self.client.get(self.base.child(profile_id), None).await
    }

    /// Update daily budgets.
    pub async fn update(&self, updates: &[ProfileUpdate]) -> Result<Vec<ProfileUpdateResult>> {
        self.client
            .put(self.base.clone(), None, Some(to_body(updates)?))
            .await
    }

    /// Register a sandbox profile for a marketplace.
    pub async fn register(&self, country_code: &str) -> Result<Value> {
        self.client
            .put(
                self.base.child("register"),
                None,
                Some(json!({ "countryCode": country_code })),
            )
            .await
    }

    /// Register a sandbox brand profile.
    pub async fn register_brand(&self, country_code: &str, brand: &str) -> Result<Value> {
        self.client
            .put(
                self.base.child("registerBrand"),
                None,
                Some(json!({ "countryCode": country_code, "brand": brand })),
            )
            .await
    }
}
