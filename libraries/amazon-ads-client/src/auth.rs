//! Login with Amazon token refresh.

use crate::error::{AdsClientError, Result};
use crate::types::TokenResponse;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

/// Token client for the Login with Amazon endpoint.
pub struct AuthClient<'a> {
    http: &'a Client,
    token_url: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, token_url: &'a str) -> Self {
        Self { http, token_url }
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse> {
        debug!(url = %self.token_url, "Refreshing access token");

        let grant = RefreshGrant {
            grant_type: "refresh_token",
            client_id,
            client_secret,
            refresh_token,
        };

        let response = self.http.post(self.token_url).form(&grant).send().await?;
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                AdsClientError::Decode(format!("Failed to parse token response: {}", e))
            })
        } else if status.as_u16() == 400 || status.as_u16() == 401 {
            // LWA reports bad grants as {"error": "...", "error_description": "..."}
            let error_text = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<serde_json::Value>(&error_text)
                .ok()
                .and_then(|v| {
                    v.get("error_description")
                        .or_else(|| v.get("error"))
                        .and_then(|e| e.as_str())
                        .map(str::to_string)
                })
                .unwrap_or(error_text);
            warn!(status = %status, "Token refresh rejected");
            Err(AdsClientError::TokenRefreshFailed(reason))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(AdsClientError::from_response(status.as_u16(), &error_text))
        }
    }
}
