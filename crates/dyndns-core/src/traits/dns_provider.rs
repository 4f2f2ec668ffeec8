// # DNS Provider Trait
//
// Defines the interface for reading and updating DNS records via provider APIs.
//
// ## Implementations
//
// - Cloudflare API v4: `dyndns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     for record in provider.list_records("023e105f4ecef8ad9ca31a8372d0c353").await? {
//         println!("{} {} {}", record.name, record.record_type, record.content);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::DnsRecord;

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// Providers are thin request/response wrappers:
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Decode provider-specific envelopes
/// - ✅ Return success or a classified failure
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff (the caller decides)
/// - ❌ Decide whether an update is needed (owned by `Reconciler`)
/// - ❌ Cache records beyond a single request
/// - ❌ Create or delete records
///
/// ## Error Classification
///
/// - Request never answered → [`Error::Transport`](crate::Error::Transport)
/// - Answer is not an envelope → [`Error::Decode`](crate::Error::Decode)
/// - Envelope with `success=false` → [`Error::Api`](crate::Error::Api), errors unchanged
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record of a zone, in provider order
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Replace a record (identified by `record.id`) with the given contents
    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
