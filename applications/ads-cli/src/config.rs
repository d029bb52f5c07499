/// CLI configuration
use amazon_ads_client::{ClientConfig, Region};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "amazon-ads.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub region: Region,

    /// Overrides the regional host
    pub base_url: Option<String>,

    #[serde(default)]
    pub client_id: String,

    pub client_secret: Option<String>,

    #[serde(default)]
    pub access_token: String,

    pub refresh_token: Option<String>,

    pub profile_id: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub poll: PollSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl CliConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (AMAZON_ADS_CLIENT_ID, AMAZON_ADS_POLL__MAX_ATTEMPTS)
        settings = settings.add_source(
            config::Environment::with_prefix("AMAZON_ADS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build().context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            bail!("client_id is required (set AMAZON_ADS_CLIENT_ID)");
        }
        if self.access_token.is_empty() {
            bail!("access_token is required (set AMAZON_ADS_ACCESS_TOKEN)");
        }
        if self.poll.max_attempts == 0 {
            bail!("poll.max_attempts must be at least 1");
        }
        Ok(())
    }

    /// Client settings for the library.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::for_region(self.region, &self.client_id, &self.access_token)
            .with_timeout(Duration::from_secs(self.timeout_secs));

        if let Some(base_url) = &self.base_url {
            config.url = base_url.clone();
        }
        if let Some(profile_id) = &self.profile_id {
            config = config.with_profile_id(profile_id);
        }
        if let (Some(secret), Some(refresh)) = (&self.client_secret, &self.refresh_token) {
            config = config.with_refresh_credentials(secret, refresh);
        }

        config
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

// Default values
fn default_timeout_secs() -> u64 {
    30
}

fn default_interval_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    60
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file_with_defaults() {
        let file = write_config(
            r#"
            region = "eu"
            client_id = "amzn1.application-oa2-client.test"
            access_token = "Atza|token"
            profile_id = "1234567890"
            "#,
        );

        let config = CliConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.region, Region::Europe);
        assert_eq!(config.client_id, "amzn1.application-oa2-client.test");
        assert_eq!(config.profile_id.as_deref(), Some("1234567890"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.poll.interval_secs, 10);
        assert_eq!(config.poll.max_attempts, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_poll_section() {
        let file = write_config(
            r#"
            client_id = "cid"
            access_token = "token"

            [poll]
            interval_secs = 2
            max_attempts = 5
            "#,
        );

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.poll.interval(), Duration::from_secs(2));
        assert_eq!(config.poll.max_attempts, 5);
    }

    #[test]
    fn test_validate_requires_credentials() {
        let file = write_config(r#"region = "na""#);
        let config = CliConfig::load(Some(file.path())).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_client_config_uses_region_and_overrides() {
        let file = write_config(
            r#"
            region = "fe"
            client_id = "cid"
            access_token = "token"
            client_secret = "secret"
            refresh_token = "refresh"
            timeout_secs = 5
            "#,
        );
        let config = CliConfig::load(Some(file.path())).unwrap();

        let client_config = config.client_config();
        assert_eq!(client_config.url, "https://advertising-api-fe.amazon.com");
        assert_eq!(client_config.token_url, "https://api.amazon.co.jp/auth/o2/token");
        assert_eq!(client_config.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(client_config.timeout, Duration::from_secs(5));

        let overridden = CliConfig {
            base_url: Some("http://localhost:9000".to_string()),
            ..config
        };
        assert_eq!(overridden.client_config().url, "http://localhost:9000");
    }
}
