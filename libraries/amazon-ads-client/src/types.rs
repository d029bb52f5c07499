//! Types for Amazon Advertising API requests and responses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Configuration
// =============================================================================

/// Amazon Advertising API region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Region {
    #[default]
    #[serde(rename = "na")]
    NorthAmerica,
    #[serde(rename = "eu")]
    Europe,
    #[serde(rename = "fe")]
    FarEast,
    #[serde(rename = "sandbox")]
    Sandbox,
}

impl Region {
    /// Advertising API host for this region.
    pub fn api_url(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "https://advertising-api.amazon.com",
            Region::Europe => "https://advertising-api-eu.amazon.com",
            Region::FarEast => "https://advertising-api-fe.amazon.com",
            Region::Sandbox => "https://advertising-api-test.amazon.com",
        }
    }

    /// Login with Amazon token endpoint for this region.
    pub fn token_url(&self) -> &'static str {
        match self {
            Region::NorthAmerica | Region::Sandbox => "https://api.amazon.com/auth/o2/token",
            Region::Europe => "https://api.amazon.co.uk/auth/o2/token",
            Region::FarEast => "https://api.amazon.co.jp/auth/o2/token",
        }
    }
}

/// Configuration for an [`AdsClient`](crate::AdsClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://advertising-api.amazon.com")
    pub url: String,
    /// Login with Amazon client id, sent with every request
    pub client_id: String,
    /// Current access token
    pub access_token: String,
    /// Advertiser profile that scopes requests
    pub profile_id: Option<String>,
    /// Client secret for the refresh grant
    pub client_secret: Option<String>,
    /// Refresh token for the refresh grant
    pub refresh_token: Option<String>,
    /// Token endpoint used by the refresh grant
    pub token_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config for an explicit base URL.
    pub fn new(
        url: impl Into<String>,
        client_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            client_id: client_id.into(),
            access_token: access_token.into(),
            profile_id: None,
            client_secret: None,
            refresh_token: None,
            token_url: Region::NorthAmerica.token_url().to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a config for one of the regional hosts.
    pub fn for_region(
        region: Region,
        client_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self::new(region.api_url(), client_id, access_token).with_token_url(region.token_url())
    }

    pub fn with_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.profile_id = Some(profile_id.into());
        self
    }

    pub fn with_refresh_credentials(
        mut self,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        self.client_secret = Some(client_secret.into());
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Response from the Login with Amazon token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    /// Token validity in seconds
    pub expires_in: u64,
}

// =============================================================================
// Profile Types
// =============================================================================

/// Advertiser account scope.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_id: i64,
    pub country_code: String,
    pub currency_code: Option<String>,
    pub daily_budget: Option<f64>,
    pub timezone: Option<String>,
    pub account_info: Option<AccountInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub marketplace_string_id: String,
    pub id: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub name: Option<String>,
}

/// Profile fields that can be updated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub profile_id: i64,
    pub daily_budget: f64,
}

/// Per-profile result of an update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateResult {
    pub profile_id: i64,
    pub code: String,
    pub details: Option<String>,
}

// =============================================================================
// Product Ad Types
// =============================================================================

/// A Sponsored Products ad.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAd {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<i64>,
    pub campaign_id: i64,
    pub ad_group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    pub state: String,
    /// Extended fields (`servingStatus`, `creationDate`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields that can be changed on an existing ad.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAdUpdate {
    pub ad_id: i64,
    pub state: String,
}

/// Per-ad result of a create, update or archive.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAdResult {
    pub ad_id: Option<i64>,
    pub code: String,
    pub description: Option<String>,
}

// =============================================================================
// Report Types
// =============================================================================

/// Report generation status. Values are API-defined strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl ReportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::Processing => "PROCESSING",
            ReportStatus::Completed => "COMPLETED",
            ReportStatus::Failed => "FAILED",
            ReportStatus::Other(s) => s,
        }
    }
}

impl From<String> for ReportStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => ReportStatus::Pending,
            "PROCESSING" => ReportStatus::Processing,
            "COMPLETED" => ReportStatus::Completed,
            "FAILED" => ReportStatus::Failed,
            _ => ReportStatus::Other(s),
        }
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The API's view of an asynchronously generated report.
///
/// Fields the client does not inspect are kept in `extra` so the handle
/// serializes back to what the API sent. `url` and `failure_reason` are
/// `None` when the key was absent and `Some(None)` when it was `null`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHandle {
    pub report_id: String,
    pub status: ReportStatus,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub failure_reason: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportHandle {
    /// Artifact URL, set once the report has completed.
    pub fn url(&self) -> Option<&str> {
        self.url.as_ref().and_then(|u| u.as_deref())
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_ref().and_then(|r| r.as_deref())
    }
}

// A present key, even `null`, deserializes to `Some`
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Outcome of polling a report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportDownload {
    /// Decoded report artifact
    Completed(Value),
    /// Report is not ready; handle as returned by the API
    InProgress(ReportHandle),
}

impl ReportDownload {
    pub fn is_completed(&self) -> bool {
        matches!(self, ReportDownload::Completed(_))
    }
}

/// Which reporting API a report is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportBase {
    /// Asynchronous reporting API (`reporting/reports`)
    Reporting,
    /// Headline Search Ads reports (`v2/hsa/{subject}/report`)
    Hsa,
}

/// Segment and metric selection for the preset reports.
#[derive(Debug, Clone, Default)]
pub struct ReportSelection {
    pub segment: Option<String>,
    pub metrics: Vec<String>,
}

impl ReportSelection {
    pub fn new(metrics: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            segment: None,
            metrics: metrics.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_status_known_and_unknown_values() {
        let status: ReportStatus = serde_json::from_value(json!("COMPLETED")).unwrap();
        assert_eq!(status, ReportStatus::Completed);

        let status: ReportStatus = serde_json::from_value(json!("IN_PROGRESS")).unwrap();
        assert_eq!(status, ReportStatus::Other("IN_PROGRESS".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("IN_PROGRESS"));
    }

    #[test]
    fn test_report_handle_keeps_unknown_fields() {
        let raw = json!({
            "reportId": "r-1",
            "status": "PENDING",
            "name": "daily",
            "createdAt": "2024-01-10T00:00:00Z",
            "url": null
        });
        let handle: ReportHandle = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(handle.report_id, "r-1");
        assert_eq!(handle.status, ReportStatus::Pending);
        assert!(handle.url().is_none());
        assert_eq!(handle.extra.get("name"), Some(&json!("daily")));
        assert_eq!(serde_json::to_value(&handle).unwrap(), raw);
    }

    #[test]
    fn test_report_handle_null_and_absent_fields_stay_distinct() {
        let with_nulls = json!({
            "reportId": "r-2",
            "status": "PROCESSING",
            "url": null,
            "failureReason": null
        });
        let handle: ReportHandle = serde_json::from_value(with_nulls.clone()).unwrap();
        assert_eq!(handle.url, Some(None));
        assert_eq!(handle.failure_reason, Some(None));
        assert_eq!(serde_json::to_value(&handle).unwrap(), with_nulls);

        let without = json!({"reportId": "r-3", "status": "PENDING"});
        let handle: ReportHandle = serde_json::from_value(without.clone()).unwrap();
        assert!(handle.url.is_none());
        assert!(handle.failure_reason.is_none());
        assert_eq!(serde_json::to_value(&handle).unwrap(), without);
    }

    #[test]
    fn test_report_handle_url_accessor() {
        let handle: ReportHandle = serde_json::from_value(json!({
            "reportId": "r-4",
            "status": "COMPLETED",
            "url": "https://offline-report-storage.example/r-4.json.gz"
        }))
        .unwrap();
        assert_eq!(
            handle.url(),
            Some("https://offline-report-storage.example/r-4.json.gz")
        );
    }

    #[test]
    fn test_region_hosts() {
        assert_eq!(
            Region::Europe.api_url(),
            "https://advertising-api-eu.amazon.com"
        );
        assert_eq!(
            Region::Sandbox.token_url(),
            "https://api.amazon.com/auth/o2/token"
        );
        let region: Region = serde_json::from_value(json!("fe")).unwrap();
        assert_eq!(region, Region::FarEast);
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::for_region(Region::Europe, "cid", "token")
            .with_profile_id("123")
            .with_refresh_credentials("secret", "refresh");

        assert_eq!(config.url, "https://advertising-api-eu.amazon.com");
        assert_eq!(config.token_url, "https://api.amazon.co.uk/auth/o2/token");
        assert_eq!(config.profile_id.as_deref(), Some("123"));
        assert_eq!(config.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
