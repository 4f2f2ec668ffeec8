// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare API v4 client used by cloudflare-dyndns.
//
// ## Behavior
//
// - ✅ One HTTP request per call, no hidden follow-up requests
// - ✅ Fixed per-call timeout (10 seconds)
// - ✅ Envelope decoding that accepts array, single-object and null results
// - ✅ Transport, decode and API failures reported as distinct error kinds
// - ❌ NO retry logic (a provider rejection will not change on retry)
// - ❌ NO caching (records are request-scoped)
// - ❌ NO record creation or deletion
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

pub mod envelope;

use async_trait::async_trait;
use dyndns_core::config::DyndnsConfig;
use dyndns_core::traits::DnsProvider;
use dyndns_core::{DnsRecord, Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use std::time::Duration;

pub use envelope::{DnsRecords, ProviderResponse, decode_records};

/// Default timeout for a single API call
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cloudflare DNS record client
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareClient {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// User-Agent header value
    user_agent: String,

    /// HTTP client for API requests, reused for every call
    client: reqwest::Client,

    /// Per-call timeout
    timeout: Duration,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CloudflareClient {
    /// Create a client from the validated configuration
    pub fn new(config: &DyndnsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Self::with_client(
            client,
            config.cloudflare.api_token.clone(),
            &config.cloudflare.base_url,
            config.main.user_agent.clone(),
        )
    }

    /// Create a client around an existing `reqwest::Client`
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `base_url`: API base URL, a trailing `/` is tolerated
    /// - `user_agent`: User-Agent header value
    pub fn with_client(
        client: reqwest::Client,
        api_token: impl Into<String>,
        base_url: &str,
        user_agent: impl Into<String>,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        Ok(Self {
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            client,
            timeout: DEFAULT_HTTP_TIMEOUT,
        })
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    fn record_url(&self, zone_id: &str, record_id: &str) -> String {
        format!("{}/{}", self.records_url(zone_id), record_id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "*/*")
            .timeout(self.timeout)
    }

    /// Send a request and decode the record envelope.
    ///
    /// The status code is not consulted: Cloudflare explains failures in the
    /// envelope, so the body is always decoded.
    async fn execute(&self, request: RequestBuilder) -> Result<Vec<DnsRecord>> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        tracing::debug!("Cloudflare responded with HTTP {} ({} bytes)", status, body.len());
        decode_records(status.as_u16(), &body)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::transport(format!("Cloudflare request timed out: {err}"))
    } else {
        Error::transport(format!("Cloudflare request failed: {err}"))
    }
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    /// List DNS records
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let url = self.records_url(zone_id);
        tracing::debug!("Listing DNS records: GET {}", url);

        let records = self.execute(self.request(Method::GET, &url)).await?;
        tracing::debug!("Found {} DNS record(s)", records.len());
        Ok(records)
    }

    /// Update a DNS record
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    ///
    /// { "id": "...", "name": "...", "type": "A", "content": "1.2.3.4", ... }
    /// ```
    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        if record.id.is_empty() {
            return Err(Error::config(format!(
                "DNS record {} has no id and cannot be updated",
                record.name
            )));
        }

        let url = self.record_url(zone_id, &record.id);
        tracing::debug!(
            "Updating DNS record: PUT {} ({} {} -> {})",
            url,
            record.record_type,
            record.name,
            record.content
        );

        self.execute(self.request(Method::PUT, &url).json(record))
            .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
