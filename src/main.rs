//! invoice-relay server binary
//!
//! Configuration comes from `INVOICE_RELAY_CONFIG` (optional YAML file) and
//! the environment; see [`invoice_relay::config`].

use anyhow::Result;
use invoice_relay::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::load()?;

    tracing::info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    ServerBuilder::new().with_config(config).serve().await
}
