//! `list` command handler.

use anyhow::{Context, Result};
use dyndns_core::{DnsProvider, DnsRecord, DyndnsConfig};
use dyndns_provider_cloudflare::CloudflareClient;
use tabled::Tabled;

use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, Debug, PartialEq, Eq)]
struct RecordRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "COMMENT")]
    comment: String,
}

impl From<&DnsRecord> for RecordRow {
    fn from(record: &DnsRecord) -> Self {
        Self {
            name: record.name.clone(),
            ip: record.content.clone(),
            comment: record
                .comment
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Only A and AAAA records, in provider order
fn address_rows(records: &[DnsRecord]) -> Vec<RecordRow> {
    records
        .iter()
        .filter(|record| record.record_type.is_address())
        .map(RecordRow::from)
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(config: &DyndnsConfig) -> Result<()> {
    let client = CloudflareClient::new(config)?;
    let records = client
        .list_records(&config.cloudflare.zone_id)
        .await
        .context("Failed to get DNS records")?;

    output::line(output::table(&address_rows(&records)));
    Ok(())
}
