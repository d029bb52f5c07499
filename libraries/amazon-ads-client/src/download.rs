//! Report artifact download.
//!
//! Completed reports are served from pre-signed URLs, usually as a gzip
//! file (`GZIP_JSON`). The artifact is fetched without API headers, since
//! the signature is part of the URL.

use crate::client::{decode_json, AdsClient};
use crate::error::{AdsClientError, Result};
use flate2::read::GzDecoder;
use serde_json::Value;
use std::io::Read;
use tracing::{debug, info, warn};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

impl AdsClient {
    /// Fetch and decode a report artifact from a pre-signed URL.
    ///
    /// Gzip payloads are decompressed before parsing. Returns the parsed
    /// JSON, typically an array of report rows.
    pub async fn download(&self, url: &str) -> Result<Value> {
        let parsed = url::Url::parse(url).map_err(|e| AdsClientError::InvalidUrl(e.to_string()))?;
        debug!(host = ?parsed.host_str(), "Downloading report artifact");

        let response = self.http().get(parsed).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Artifact download failed");
            return Err(AdsClientError::from_response(status.as_u16(), &error_text));
        }

        let bytes = response.bytes().await?;
        let artifact = decode_artifact(&bytes)?;

        info!(size = bytes.len(), "Report artifact downloaded");
        Ok(artifact)
    }
}

/// Decode an artifact body, gunzipping it first when it is compressed.
pub fn decode_artifact(bytes: &[u8]) -> Result<Value> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| AdsClientError::Decode(format!("Corrupt gzip payload: {}", e)))?;
        decode_json(&decompressed)
    } else {
        decode_json(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::json;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decode_plain_json() {
        let value = decode_artifact(br#"[{"impressions": 10}]"#).unwrap();
        assert_eq!(value, json!([{"impressions": 10}]));
    }

    #[test]
    fn test_decode_gzip_json() {
        let compressed = gzip(br#"[{"campaignId": 1, "clicks": 3}]"#);
        let value = decode_artifact(&compressed).unwrap();
        assert_eq!(value, json!([{"campaignId": 1, "clicks": 3}]));
    }

    #[test]
    fn test_truncated_gzip_is_decode_error() {
        let mut compressed = gzip(br#"[{"campaignId": 1}]"#);
        compressed.truncate(12);

        match decode_artifact(&compressed) {
            Err(AdsClientError::Decode(msg)) => assert!(msg.contains("gzip")),
            other => panic!("Expected Decode error, got: {:?}", other),
        }
    }

    #[test]
    fn test_gzip_of_non_json_is_decode_error() {
        let compressed = gzip(b"campaignId,clicks\n1,3\n");
        assert!(matches!(
            decode_artifact(&compressed),
            Err(AdsClientError::Decode(_))
        ));
    }
}
