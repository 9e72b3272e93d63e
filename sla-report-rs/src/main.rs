//! SLA breach report entrypoint
//!
//! Reads the run parameters from a JSON file, builds the service clients
//! from the environment configuration and streams the report rows
//! tab-separated to stdout.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use service_sdk::config::DEFAULT_PROVIDER;
use service_sdk::core::AuthenticatedClient;
use service_sdk::{CommerceConfig, TicketingConfig};

use sla_report::{ReportDriver, ReportParameters};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let parameters_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SLAREP_PARAMETERS").ok())
        .context("usage: sla-report <parameters.json>")?;

    let raw = std::fs::read_to_string(&parameters_path)
        .with_context(|| format!("failed to read parameters file {}", parameters_path))?;
    let parameters: ReportParameters =
        serde_json::from_str(&raw).context("failed to parse report parameters")?;

    let ticketing_config = TicketingConfig::from_provider(&**DEFAULT_PROVIDER)?;
    let mut ticketing = service_sdk::ticketing::TicketingClient::new(ticketing_config)?;
    // The ticketing token travels with the run parameters
    ticketing.set_auth(parameters.api_token.clone())?;

    let commerce_config = CommerceConfig::from_provider(&**DEFAULT_PROVIDER)?;
    let commerce = service_sdk::commerce::CommerceClient::new(commerce_config)?;

    let driver = ReportDriver::new(commerce, ticketing, parameters);
    let mut run = driver
        .start(Box::new(|current, total| {
            info!("progress {}/{}", current, total);
        }))
        .await?;

    while let Some(row) = run.next_row().await? {
        println!("{}", row.cells().join("\t"));
    }

    Ok(())
}
