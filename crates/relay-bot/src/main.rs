mod bootstrap_helpers;
mod health_server;
mod startup_dispatch;

use anyhow::{Context, Result};
use clap::Parser;
use relay_cli::{Cli, RelayConfig};
use tracing::info;

use crate::bootstrap_helpers::init_tracing;
use crate::startup_dispatch::{run_device_listing, run_listen_mode};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    if !cli.list_devices {
        info!(
            discord_token_present = cli.discord_token.is_some(),
            "starting switchbot ping relay"
        );
    }
    let config = RelayConfig::from_cli(&cli).context("invalid relay configuration")?;

    match config {
        RelayConfig::ListDevices(listing) => run_device_listing(listing).await,
        RelayConfig::Listen(listen) => run_listen_mode(listen).await,
    }
}
