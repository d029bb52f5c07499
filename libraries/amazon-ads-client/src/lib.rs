//! Amazon Advertising API Client
//!
//! HTTP client library for the Amazon Advertising API.
//!
//! # Features
//!
//! - **Client**: authentication headers, path composition, error mapping
//! - **Profiles**: list, fetch, update and register advertiser profiles
//! - **Product ads**: Sponsored Products ad CRUD
//! - **Stores**: Amazon Stores lookup
//! - **Reports**: submit reports, poll them and download the (gzipped) artifact
//!
//! # Example
//!
//! ```ignore
//! use amazon_ads_client::{AdsClient, ClientConfig, Region, ReportDownload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::for_region(Region::NorthAmerica, "client-id", "access-token")
//!         .with_profile_id("1234567890");
//!     let client = AdsClient::new(config)?;
//!
//!     // Submit a report
//!     let handle = client.reports().get_ad_groups("2024-01-10", Some("2024-01-16")).await?;
//!
//!     // Poll it; the caller decides how long to wait
//!     loop {
//!         match client.reports().download(&handle.report_id).await? {
//!             ReportDownload::Completed(rows) => {
//!                 println!("{}", rows);
//!                 break;
//!             }
//!             ReportDownload::InProgress(_) => {
//!                 tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod download;
mod error;
mod request;
mod resources;
mod types;

// Re-export main types
pub use client::{AdsClient, CLIENT_ID_HEADER, SCOPE_HEADER};
pub use download::decode_artifact;
pub use error::{AdsClientError, Result};
pub use request::{query_pairs, ApiPath, ApiRequest, Params};
pub use types::{
    AccountInfo, ClientConfig, ProductAd, ProductAdResult, ProductAdUpdate, Profile,
    ProfileUpdate, ProfileUpdateResult, Region, ReportBase, ReportDownload, ReportHandle,
    ReportSelection, ReportStatus, TokenResponse, DEFAULT_TIMEOUT,
};

// Re-export resources for direct use if needed
pub use auth::AuthClient;
pub use resources::{
    ad_group_report_dates, build_submission, ProductAds, Profiles, Reports, Stores,
    AD_GROUP_COLUMNS, REPORT_CONTENT_TYPE,
};
