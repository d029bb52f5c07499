/// amazon-ads - command-line access to the Amazon Advertising API
mod config;
mod poll;

use amazon_ads_client::{AdsClient, ReportDownload};
use anyhow::Context;
use clap::{Parser, Subcommand};
use crate::config::CliConfig;
use crate::poll::wait_for_report;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "amazon-ads")]
#[command(about = "Amazon Advertising API client", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./amazon-ads.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List advertiser profiles
    Profiles,
    /// Show one profile
    Profile {
        /// Profile id
        id: String,
    },
    /// List Amazon Stores
    Stores,
    /// List Sponsored Products ads
    ProductAds {
        /// Comma-separated state filter (enabled,paused,archived)
        #[arg(long)]
        state: Option<String>,
    },
    /// Submit the daily campaigns-with-ad-group report
    AdGroupsReport {
        /// First day (YYYY-MM-DD)
        start: String,
        /// Last day; defaults to the day before START
        #[arg(long)]
        end: Option<String>,
    },
    /// Check a report and download it once completed
    Report {
        /// Report id
        id: String,
        /// Poll until the report completes
        #[arg(long)]
        wait: bool,
    },
    /// Exchange the refresh token for a new access token
    RefreshToken,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let client = AdsClient::new(config.client_config()).context("Failed to create client")?;

    match cli.command {
        Commands::Profiles => print_json(&client.profiles().all().await?)?,
        Commands::Profile { id } => print_json(&client.profiles().get(&id).await?)?,
        Commands::Stores => print_json(&client.stores().list().await?)?,
        Commands::ProductAds { state } => {
            let query = state.map(|s| {
                let mut params = amazon_ads_client::Params::new();
                params.insert("stateFilter".to_string(), json!(s));
                params
            });
            print_json(&client.product_ads().list(query).await?)?;
        }
        Commands::AdGroupsReport { start, end } => {
            let handle = client
                .reports()
                .get_ad_groups(&start, end.as_deref())
                .await?;
            print_json(&handle)?;
        }
        Commands::Report { id, wait } => {
            if wait {
                let artifact = wait_for_report(&client, &id, &config.poll).await?;
                print_json(&artifact)?;
            } else {
                match client.reports().download(&id).await? {
                    ReportDownload::Completed(artifact) => print_json(&artifact)?,
                    ReportDownload::InProgress(handle) => print_json(&handle)?,
                }
            }
        }
        Commands::RefreshToken => {
            let token = client.refresh_access_token().await?;
            print_json(&json!({
                "access_token": token.access_token,
                "refresh_token": token.refresh_token,
                "expires_in": token.expires_in,
            }))?;
        }
    }

    Ok(())
}

/// Log filter used when `RUST_LOG` is unset: the library and this binary.
fn default_filter() -> String {
    format!("amazon_ads_client=info,{}=info", env!("CARGO_CRATE_NAME"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_this_binary() {
        let crate_root = module_path!().split("::").next().unwrap();
        let directive = format!("{}=info", crate_root);

        assert_eq!(crate_root, "amazon_ads");
        assert!(default_filter().split(',').any(|d| d == directive));
    }

    #[test]
    fn test_cli_parses_report_wait() {
        let cli = Cli::try_parse_from(["amazon-ads", "report", "r-1", "--wait"]).unwrap();
        match cli.command {
            Commands::Report { id, wait } => {
                assert_eq!(id, "r-1");
                assert!(wait);
            }
            _ => panic!("Expected report command"),
        }
    }
}
