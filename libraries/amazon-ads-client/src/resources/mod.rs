//! Resource wrappers, one per API resource family.
//!
//! Each wrapper borrows the [`AdsClient`](crate::AdsClient) and owns its base
//! path, so tests and alternate deployments can point it elsewhere with
//! `with_base_path`.

mod product_ads;
mod profiles;
mod reports;
mod stores;

pub use product_ads::ProductAds;
pub use profiles::Profiles;
pub use reports::{
    ad_group_report_dates, build_submission, Reports, AD_GROUP_COLUMNS, REPORT_CONTENT_TYPE,
};
pub use stores::Stores;

use crate::error::{AdsClientError, Result};
use serde::Serialize;
use serde_json::Value;

fn to_body<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| AdsClientError::Encode(e.to_string()))
}
