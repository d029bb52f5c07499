//! Sponsored Products ads.

use super::to_body;
use crate::client::AdsClient;
use crate::error::Result;
use crate::request::{ApiPath, Params};
use crate::types::{ProductAd, ProductAdResult, ProductAdUpdate};

/// Product ads resource (`v2/sp/productAds`).
pub struct ProductAds<'a> {
    client: &'a AdsClient,
    base: ApiPath,
}

impl<'a> ProductAds<'a> {
    pub const BASE_PATH: &'static str = "v2/sp/productAds";

    pub(crate) fn new(client: &'a AdsClient) -> Self {
        Self::with_base_path(client, Self::BASE_PATH)
    }

    pub fn with_base_path(client: &'a AdsClient, base: impl Into<ApiPath>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }

    /// List ads, filtered by `query` (`stateFilter`, `campaignIdFilter`, ...).
    pub async fn list(&self, query: Option<Params>) -> Result<Vec<ProductAd>> {
        self.client.get(self.base.clone(), query).await
    }

    /// List ads with extended fields.
    pub async fn list_extended(&self, query: Option<Params>) -> Result<Vec<ProductAd>> {
        self.client.get(self.base.child("extended"), query).await
    }

    pub async fn get(&self, ad_id: &str) -> Result<ProductAd> {
        self.client.get(self.base.child(ad_id), None).await
    }

    pub async fn get_extended(&self, ad_id: &str) -> Result<ProductAd> {
        self.client
            .get(self.base.child("extended").child(ad_id), None)
            .await
    }

    pub async fn create(&self, ads: &[ProductAd]) -> Result<Vec<ProductAdResult>> {
        self.client
            .post(self.base.clone(), None, Some(to_body(ads)?))
            .await
    }

    pub async fn update(&self, updates: &[ProductAdUpdate]) -> Result<Vec<ProductAdResult>> {
        self.client
            .put(self.base.clone(), None, Some(to_body(updates)?))
            .await
    }

    /// Archive an ad. Archived ads cannot be re-enabled.
    pub async fn archive(&self, ad_id: &str) -> Result<ProductAdResult> {
        self.client.delete(self.base.child(ad_id), None).await
    }
}
