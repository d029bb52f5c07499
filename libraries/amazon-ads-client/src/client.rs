//! Main Amazon Advertising API client.

use crate::auth::AuthClient;
use crate::error::{AdsClientError, Result};
use crate::request::{query_pairs, ApiPath, ApiRequest, Params, JSON_CONTENT_TYPE};
use crate::resources::{ProductAds, Profiles, Reports, Stores};
use crate::types::{ClientConfig, TokenResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Header carrying the Login with Amazon client id.
pub const CLIENT_ID_HEADER: &str = "Amazon-Advertising-API-ClientId";
/// Header carrying the advertiser profile id.
pub const SCOPE_HEADER: &str = "Amazon-Advertising-API-Scope";

/// Client for the Amazon Advertising API.
///
/// All outbound traffic goes through this type. It holds the base URL and
/// credentials, attaches the authentication headers, and turns failed
/// responses into [`AdsClientError`]. Cloning is cheap and clones share
/// credentials, so a token set with [`AdsClient::set_access_token`] is seen
/// by every clone.
///
/// # Example
///
/// ```ignore
/// use amazon_ads_client::{AdsClient, ClientConfig, Region};
///
/// let config = ClientConfig::for_region(Region::NorthAmerica, "client-id", "access-token")
///     .with_profile_id("1234567890");
/// let client = AdsClient::new(config)?;
///
/// let profiles = client.profiles().all().await?;
/// println!("Found {} profiles", profiles.len());
/// ```
#[derive(Clone)]
pub struct AdsClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

/// Per-call snapshot of the credentials.
struct Session {
    url: String,
    client_id: String,
    access_token: String,
    profile_id: Option<String>,
}

impl AdsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(AdsClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AdsClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| AdsClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("amazon-ads-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(ClientConfig { url, ..config })),
        })
    }

    /// Get the base URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Get the profile id requests are scoped to.
    pub async fn profile_id(&self) -> Option<String> {
        self.config.read().await.profile_id.clone()
    }

    /// Scope subsequent requests to another profile.
    pub async fn set_profile_id(&self, profile_id: Option<String>) {
        self.config.write().await.profile_id = profile_id;
    }

    /// Replace the access token (e.g., after refreshing it elsewhere).
    pub async fn set_access_token(&self, access_token: impl Into<String>) {
        self.config.write().await.access_token = access_token.into();
    }

    /// Exchange the configured refresh token for a new access token.
    ///
    /// The new token is stored for subsequent requests. This only runs when
    /// called; the client never refreshes on its own.
    pub async fn refresh_access_token(&self) -> Result<TokenResponse> {
        let config = self.config.read().await;
        let (Some(client_secret), Some(refresh_token)) =
            (config.client_secret.clone(), config.refresh_token.clone())
        else {
            return Err(AdsClientError::MissingRefreshCredentials);
        };
        let token_url = config.token_url.clone();
        let client_id = config.client_id.clone();
        drop(config);

        let auth_client = AuthClient::new(&self.http, &token_url);
        let response = auth_client
            .refresh(&client_id, &client_secret, &refresh_token)
            .await?;
        info!(expires_in = response.expires_in, "Access token refreshed");

        let mut config = self.config.write().await;
        config.access_token = response.access_token.clone();
        if let Some(rotated) = &response.refresh_token {
            config.refresh_token = Some(rotated.clone());
        }

        Ok(response)
    }

    /// Profiles resource.
    pub fn profiles(&self) -> Profiles<'_> {
        Profiles::new(self)
    }

    /// Sponsored Products ads resource.
    pub fn product_ads(&self) -> ProductAds<'_> {
        ProductAds::new(self)
    }

    /// Reports resource.
    pub fn reports(&self) -> Reports<'_> {
        Reports::new(self)
    }

    /// Stores resource.
    pub fn stores(&self) -> Stores<'_> {
        Stores::new(self)
    }

    /// GET `path` with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: impl Into<ApiPath>,
        query: Option<Params>,
    ) -> Result<T> {
        self.execute(ApiRequest::get(path).query(query)).await
    }

    /// POST `body` to `path`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: impl Into<ApiPath>,
        query: Option<Params>,
        body: Option<Value>,
    ) -> Result<T> {
        self.execute(ApiRequest::post(path).query(query).body(body))
            .await
    }

    /// PUT `body` to `path`.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: impl Into<ApiPath>,
        query: Option<Params>,
        body: Option<Value>,
    ) -> Result<T> {
        self.execute(ApiRequest::put(path).query(query).body(body))
            .await
    }

    /// DELETE `path`; the identifier is normally the last path segment.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: impl Into<ApiPath>,
        query: Option<Params>,
    ) -> Result<T> {
        self.execute(ApiRequest::delete(path).query(query)).await
    }

    /// Send a request descriptor and decode the JSON response.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let session = self.session().await;
        let url = request.path.to_url(&session.url)?;
        debug!(method = %request.method, url = %url, "Sending API request");

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .bearer_auth(&session.access_token)
            .header(CLIENT_ID_HEADER, &session.client_id)
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if request.scoped {
            if let Some(profile_id) = &session.profile_id {
                builder = builder.header(SCOPE_HEADER, profile_id);
            }
        }

        if let Some(query) = &request.query {
            builder = builder.query(&query_pairs(query));
        }

        if let Some(body) = &request.body {
            let content_type = request.content_type.as_deref().unwrap_or(JSON_CONTENT_TYPE);
            let encoded = serde_json::to_vec(body)
                .map_err(|e| AdsClientError::Encode(e.to_string()))?;
            builder = builder.header(CONTENT_TYPE, content_type).body(encoded);
        }

        let response = builder.send().await?;
        handle_response(response, url.as_str()).await
    }

    async fn session(&self) -> Session {
        let config = self.config.read().await;
        Session {
            url: config.url.clone(),
            client_id: config.client_id.clone(),
            access_token: config.access_token.clone(),
            profile_id: config.profile_id.clone(),
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

/// Turn a response into a decoded body or an API error.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: Response,
    url: &str,
) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), size = bytes.len(), "API request succeeded");
        decode_json(&bytes)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        warn!(status = %status, url = %url, "API request failed");
        Err(AdsClientError::from_response(status.as_u16(), &error_text))
    }
}

/// Decode a JSON body; an empty body decodes as `null`.
pub(crate) fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(bytes)
        .map_err(|e| AdsClientError::Decode(format!("Invalid JSON response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(AdsClient::new(ClientConfig::new("https://example.com", "c", "t")).is_ok());
        assert!(AdsClient::new(ClientConfig::new("http://localhost:8080", "c", "t")).is_ok());

        // Invalid URLs
        assert!(AdsClient::new(ClientConfig::new("", "c", "t")).is_err());
        assert!(AdsClient::new(ClientConfig::new("not-a-url", "c", "t")).is_err());
        assert!(AdsClient::new(ClientConfig::new("ftp://example.com", "c", "t")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client = AdsClient::new(ClientConfig::new("https://example.com/", "c", "t"))
            .expect("valid url");

        let url = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(client.url());
        assert_eq!(url, "https://example.com");
    }

    #[test]
    fn test_decode_json_empty_body_is_null() {
        let value: Value = decode_json(b"").unwrap();
        assert!(value.is_null());

        let value: Option<Vec<i64>> = decode_json(b"  \n").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_json_invalid_body() {
        let result: Result<Value> = decode_json(b"<html>");
        match result {
            Err(AdsClientError::Decode(msg)) => assert!(msg.contains("Invalid JSON")),
            other => panic!("Expected Decode error, got: {:?}", other),
        }
    }
}
