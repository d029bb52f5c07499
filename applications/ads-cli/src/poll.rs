/// Bounded report polling for `report --wait`
use crate::config::PollSettings;
use amazon_ads_client::{AdsClient, ReportDownload};
use anyhow::bail;
use serde_json::Value;
use tracing::info;

/// Poll a report until it completes or the attempt limit is reached.
///
/// A failed report aborts immediately with the client's error.
pub async fn wait_for_report(
    client: &AdsClient,
    report_id: &str,
    poll: &PollSettings,
) -> anyhow::Result<Value> {
    for attempt in 1..=poll.max_attempts {
        match client.reports().download(report_id).await? {
            ReportDownload::Completed(artifact) => return Ok(artifact),
            ReportDownload::InProgress(handle) => {
                info!(
                    report_id = %report_id,
                    status = %handle.status,
                    attempt,
                    max_attempts = poll.max_attempts,
                    "Report not ready"
                );
                if attempt < poll.max_attempts {
                    tokio::time::sleep(poll.interval()).await;
                }
            }
        }
    }

    bail!(
        "Report {} not ready after {} attempts",
        report_id,
        poll.max_attempts
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use amazon_ads_client::{AdsClientError, ClientConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_client() -> (MockServer, AdsClient) {
        let mock_server = MockServer::start().await;
        let config = ClientConfig::new(mock_server.uri(), "client_abc", "access_token_123");
        let client = AdsClient::new(config).unwrap();
        (mock_server, client)
    }

    fn settings(max_attempts: u32) -> PollSettings {
        PollSettings {
            interval_secs: 0,
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/reporting/reports/r-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reportId": "r-1",
                "status": "PENDING"
            })))
            .expect(3)
            .mount(&mock_server)
            .await;

        let err = wait_for_report(&client, "r-1", &settings(3))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not ready after 3 attempts"));
    }

    #[tokio::test]
    async fn test_returns_artifact_once_completed() {
        let (mock_server, client) = setup_client().await;
        let artifact_url = format!("{}/artifacts/r-2.json", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/reporting/reports/r-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reportId": "r-2",
                "status": "PENDING",
                "url": null
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/reporting/reports/r-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reportId": "r-2",
                "status": "COMPLETED",
                "url": artifact_url
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/artifacts/r-2.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"adGroupId": 9, "clicks": 4}])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let artifact = wait_for_report(&client, "r-2", &settings(5)).await.unwrap();
        assert_eq!(artifact, json!([{"adGroupId": 9, "clicks": 4}]));
    }

    #[tokio::test]
    async fn test_failed_report_stops_polling() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/reporting/reports/r-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reportId": "r-3",
                "status": "FAILED",
                "failureReason": "Invalid date range"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = wait_for_report(&client, "r-3", &settings(5))
            .await
            .unwrap_err();
        match err.downcast_ref::<AdsClientError>() {
            Some(AdsClientError::ReportFailed { report_id, reason }) => {
                assert_eq!(report_id, "r-3");
                assert_eq!(reason, "Invalid date range");
            }
            other => panic!("Expected ReportFailed, got: {:?}", other),
        }
    }
}
