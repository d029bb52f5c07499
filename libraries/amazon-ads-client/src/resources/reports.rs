//! Report submission and download.
//!
//! Reports are generated asynchronously:
//!
//! 1. [`Reports::retrieve`] submits a report request and returns a handle,
//!    usually with status `PENDING`.
//! 2. [`Reports::download`] looks the handle up by id. A `COMPLETED` report
//!    has its artifact fetched and decoded; any other non-failed status
//!    returns the handle as-is. Callers poll by calling `download` again and
//!    own the wait interval and the give-up policy.
//!
//! A `FAILED` report is an error, never an in-progress handle.

use crate::client::AdsClient;
use crate::error::{AdsClientError, Result};
use crate::request::{ApiPath, ApiRequest, Params};
use crate::types::{ReportBase, ReportDownload, ReportHandle, ReportSelection, ReportStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::America::Los_Angeles;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Content type the asynchronous reporting API expects for submissions.
pub const REPORT_CONTENT_TYPE: &str = "application/vnd.createasyncreportrequest.v3+json";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const AD_GROUP_REPORT_NAME: &str = "SponsoredProductsCampaignsWithAdGroupDailyReport";

/// Columns requested by [`Reports::get_ad_groups`].
pub const AD_GROUP_COLUMNS: &[&str] = &[
    "impressions",
    "clicks",
    "cost",
    "purchases1d",
    "purchases7d",
    "purchases14d",
    "purchases30d",
    "purchasesSameSku1d",
    "purchasesSameSku7d",
    "purchasesSameSku14d",
    "purchasesSameSku30d",
    "unitsSoldClicks1d",
    "unitsSoldClicks7d",
    "unitsSoldClicks14d",
    "unitsSoldClicks30d",
    "sales1d",
    "sales7d",
    "sales14d",
    "sales30d",
    "attributedSalesSameSku1d",
    "attributedSalesSameSku7d",
    "attributedSalesSameSku14d",
    "attributedSalesSameSku30d",
    "unitsSoldSameSku1d",
    "unitsSoldSameSku7d",
    "unitsSoldSameSku14d",
    "unitsSoldSameSku30d",
    "kindleEditionNormalizedPagesRead14d",
    "kindleEditionNormalizedPagesRoyalties14d",
    "date",
    "campaignBiddingStrategy",
    "costPerClick",
    "clickThroughRate",
    "spend",
    "campaignName",
    "campaignId",
    "campaignStatus",
    "campaignBudgetType",
    "campaignBudgetAmount",
    "campaignRuleBasedBudgetAmount",
    "campaignApplicableBudgetRuleId",
    "campaignApplicableBudgetRuleName",
    "campaignBudgetCurrencyCode",
    "adGroupName",
    "adGroupId",
    "adStatus",
];

/// Reports resource.
pub struct Reports<'a> {
    client: &'a AdsClient,
    base: ApiPath,
    hsa_base: ApiPath,
}

impl<'a> Reports<'a> {
    pub const BASE_PATH: &'static str = "reporting/reports";
    pub const HSA_BASE_PATH: &'static str = "v2/hsa";

    pub(crate) fn new(client: &'a AdsClient) -> Self {
        Self::with_base_paths(client, Self::BASE_PATH, Self::HSA_BASE_PATH)
    }

    pub fn with_base_paths(
        client: &'a AdsClient,
        base: impl Into<ApiPath>,
        hsa_base: impl Into<ApiPath>,
    ) -> Self {
        Self {
            client,
            base: base.into(),
            hsa_base: hsa_base.into(),
        }
    }

    /// Submit a report request to the reporting API.
    ///
    /// `name`, `start_date` and `end_date` are merged into `configuration`
    /// when non-empty.
    pub async fn retrieve(
        &self,
        name: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        configuration: Params,
    ) -> Result<ReportHandle> {
        self.retrieve_in(ReportBase::Reporting, name, start_date, end_date, configuration)
            .await
    }

    /// Submit a report request to the selected reporting API.
    ///
    /// Headline Search Ads reports are posted to `{hsa}/{name}/report`.
    pub async fn retrieve_in(
        &self,
        base: ReportBase,
        name: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        configuration: Params,
    ) -> Result<ReportHandle> {
        let payload = build_submission(name, start_date, end_date, configuration);

        let request = match base {
            ReportBase::Reporting => {
                ApiRequest::post(self.base.clone()).content_type(REPORT_CONTENT_TYPE)
            }
            ReportBase::Hsa => {
                let subject = name.filter(|n| !n.is_empty()).unwrap_or("campaigns");
                ApiRequest::post(self.hsa_base.child(subject).child("report"))
            }
        };

        let handle: ReportHandle = self
            .client
            .execute(request.body(Some(Value::Object(payload))))
            .await?;

        info!(
            report_id = %handle.report_id,
            status = %handle.status,
            ?base,
            "Report submitted"
        );
        Ok(handle)
    }

    /// Poll a report by id; fetch its artifact once it has completed.
    pub async fn download(&self, report_id: &str) -> Result<ReportDownload> {
        let handle: ReportHandle = self.client.get(self.base.child(report_id), None).await?;

        match handle.status {
            ReportStatus::Completed => {
                let url = handle.url().ok_or_else(|| {
                    AdsClientError::Decode(format!(
                        "Report {} is completed but has no download URL",
                        handle.report_id
                    ))
                })?;
                let artifact = self.client.download(url).await?;
                info!(report_id = %handle.report_id, "Report downloaded");
                Ok(ReportDownload::Completed(artifact))
            }
            ReportStatus::Failed => {
                let reason = handle
                    .failure_reason()
                    .unwrap_or("no failure reason given")
                    .to_string();
                warn!(report_id = %handle.report_id, reason = %reason, "Report failed");
                Err(AdsClientError::ReportFailed {
                    report_id: handle.report_id,
                    reason,
                })
            }
            _ => {
                debug!(report_id = %handle.report_id, status = %handle.status, "Report not ready");
                Ok(ReportDownload::InProgress(handle))
            }
        }
    }

    /// Campaign report.
    pub async fn get_campaigns(
        &self,
        base: ReportBase,
        start_date: &str,
        end_date: Option<&str>,
        selection: &ReportSelection,
    ) -> Result<ReportHandle> {
        self.preset(base, "campaigns", start_date, end_date, selection)
            .await
    }

    /// Sponsored Products campaigns-with-ad-group daily report.
    ///
    /// Dates are read in the `America/Los_Angeles` zone, as `YYYY-MM-DD`,
    /// `YYYY-MM-DD HH:MM:SS`, RFC 3339 or `today`/`yesterday`/`tomorrow`.
    /// Anything else fails with `InvalidDate` before a request is sent.
    ///
    /// Without `end_date` the end defaults to the day before `start_date`,
    /// which yields a range ending before it starts; see
    /// [`ad_group_report_dates`].
    pub async fn get_ad_groups(
        &self,
        start_date: &str,
        end_date: Option<&str>,
    ) -> Result<ReportHandle> {
        let (start, end) = ad_group_report_dates(start_date, end_date)?;

        let mut configuration = Params::new();
        configuration.insert("adProduct".to_string(), json!("SPONSORED_PRODUCTS"));
        configuration.insert("columns".to_string(), json!(AD_GROUP_COLUMNS));
        configuration.insert("reportTypeId".to_string(), json!("spCampaigns"));
        configuration.insert("format".to_string(), json!("GZIP_JSON"));
        configuration.insert("groupBy".to_string(), json!(["campaign", "adGroup"]));
        configuration.insert("timeUnit".to_string(), json!("DAILY"));

        self.retrieve(
            Some(AD_GROUP_REPORT_NAME),
            Some(&start),
            Some(&end),
            configuration,
        )
        .await
    }

    /// Headline Search Ads ad group report.
    pub async fn get_ad_groups_hsa(
        &self,
        start_date: &str,
        end_date: Option<&str>,
        selection: &ReportSelection,
    ) -> Result<ReportHandle> {
        self.preset(ReportBase::Hsa, "adGroups", start_date, end_date, selection)
            .await
    }

    /// Keyword report.
    pub async fn get_keywords(
        &self,
        base: ReportBase,
        start_date: &str,
        end_date: Option<&str>,
        selection: &ReportSelection,
    ) -> Result<ReportHandle> {
        self.preset(base, "keywords", start_date, end_date, selection)
            .await
    }

    /// Product ads report.
    pub async fn get_product_ads(
        &self,
        start_date: &str,
        end_date: Option<&str>,
        selection: &ReportSelection,
    ) -> Result<ReportHandle> {
        self.preset(
            ReportBase::Reporting,
            "productAds",
            start_date,
            end_date,
            selection,
        )
        .await
    }

    /// Product targeting report.
    pub async fn get_product_targeting(
        &self,
        start_date: &str,
        end_date: Option<&str>,
        selection: &ReportSelection,
    ) -> Result<ReportHandle> {
        self.preset(
            ReportBase::Reporting,
            "targets",
            start_date,
            end_date,
            selection,
        )
        .await
    }

    async fn preset(
        &self,
        base: ReportBase,
        subject: &str,
        start_date: &str,
        end_date: Option<&str>,
        selection: &ReportSelection,
    ) -> Result<ReportHandle> {
        let mut configuration = Params::new();
        if !selection.metrics.is_empty() {
            configuration.insert("metrics".to_string(), json!(selection.metrics));
        }
        if let Some(segment) = selection.segment.as_deref().filter(|s| !s.is_empty()) {
            configuration.insert("segment".to_string(), json!(segment));
        }

        self.retrieve_in(base, Some(subject), Some(start_date), end_date, configuration)
            .await
    }
}

/// Merge the report name and date range into a submission payload.
///
/// Each of `name`, `start_date` and `end_date` is only inserted when it is
/// present and non-empty; absent values leave the key out entirely.
pub fn build_submission(
    name: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    configuration: Params,
) -> Params {
    let mut payload = configuration;
    for (key, value) in [
        ("name", name),
        ("startDate", start_date),
        ("endDate", end_date),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            payload.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    payload
}

/// Normalize the ad group report date range to `YYYY-MM-DD`.
///
/// Without an end date the end is one day before the start. Existing
/// callers depend on this, even though the range ends before it begins.
pub fn ad_group_report_dates(start_date: &str, end_date: Option<&str>) -> Result<(String, String)> {
    let start = parse_report_date(start_date)?;

    let end = match end_date.filter(|d| !d.trim().is_empty()) {
        Some(end_date) => parse_report_date(end_date)?,
        None => start
            .pred_opt()
            .ok_or_else(|| AdsClientError::InvalidDate(start_date.to_string()))?,
    };

    Ok((
        start.format(DATE_FORMAT).to_string(),
        end.format(DATE_FORMAT).to_string(),
    ))
}

/// Read a date as a calendar day in Los Angeles.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (Los Angeles wall time),
/// RFC 3339 timestamps (converted to Los Angeles time) and the relative
/// words `today`, `yesterday` and `tomorrow`.
fn parse_report_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Ok(datetime.date());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Los_Angeles).date_naive());
    }

    let today = Utc::now().with_timezone(&Los_Angeles).date_naive();
    let relative = match trimmed.to_ascii_lowercase().as_str() {
        "today" => Some(today),
        "yesterday" => today.pred_opt(),
        "tomorrow" => today.succ_opt(),
        _ => None,
    };

    relative.ok_or_else(|| AdsClientError::InvalidDate(input.to_string()))
}
