//! Error types for the Amazon Advertising client.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the Amazon Advertising API.
#[derive(Error, Debug)]
pub enum AdsClientError {
    /// Network, connection or timeout failure
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// Amazon error code, e.g. `UNAUTHORIZED` or `NOT_FOUND`
        code: Option<String>,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// Report generation ended in `FAILED`
    #[error("Report {report_id} failed: {reason}")]
    ReportFailed { report_id: String, reason: String },

    /// Invalid base or artifact URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Report date could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Refresh grant needs a client secret and refresh token
    #[error("Token refresh requires a client secret and refresh token")]
    MissingRefreshCredentials,

    /// Login with Amazon rejected the refresh grant
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),
}

impl AdsClientError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdsClientError::Api { status, .. } => Some(*status),
            AdsClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Amazon error code carried by an [`AdsClientError::Api`] error.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            AdsClientError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Build an API error from a status and raw response body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            code: Option<serde_json::Value>,
            details: Option<String>,
            message: Option<String>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                // Some endpoints send the code as a number
                let code = parsed.code.and_then(|c| match c {
                    serde_json::Value::String(s) => Some(s),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                let message = parsed
                    .details
                    .or(parsed.message)
                    .unwrap_or_else(|| body.to_string());
                AdsClientError::Api {
                    status,
                    code,
                    message,
                }
            }
            Err(_) => AdsClientError::Api {
                status,
                code: None,
                message: body.to_string(),
            },
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, AdsClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_with_details() {
        let err = AdsClientError::from_response(
            401,
            r#"{"code":"UNAUTHORIZED","details":"Not authorized to access scope 123"}"#,
        );

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.api_code(), Some("UNAUTHORIZED"));
        match err {
            AdsClientError::Api { message, .. } => {
                assert_eq!(message, "Not authorized to access scope 123");
            }
            e => panic!("Expected Api error, got: {:?}", e),
        }
    }

    #[test]
    fn test_from_response_numeric_code() {
        let err = AdsClientError::from_response(422, r#"{"code":"422","message":"bad"}"#);
        assert_eq!(err.api_code(), Some("422"));

        let err = AdsClientError::from_response(400, r#"{"code":400,"message":"bad"}"#);
        assert_eq!(err.api_code(), Some("400"));
    }

    #[test]
    fn test_from_response_plain_text() {
        let err = AdsClientError::from_response(502, "Bad Gateway");

        assert_eq!(err.status(), Some(502));
        assert!(err.api_code().is_none());
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        assert!(AdsClientError::Decode("x".into()).status().is_none());
        assert!(AdsClientError::MissingRefreshCredentials.status().is_none());
    }
}
