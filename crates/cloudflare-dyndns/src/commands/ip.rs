//! `ip` command handler.

use anyhow::{Context, Result};
use dyndns_core::{DyndnsConfig, IpResolver};
use dyndns_ip_http::HttpIpResolver;

use crate::output;

pub async fn handle(config: &DyndnsConfig) -> Result<()> {
    let resolver = HttpIpResolver::new(config)?;
    let address = resolver
        .resolve()
        .await
        .context("Failed to retrieve public IP")?;

    output::line(address);
    Ok(())
}
