//! Cloudflare API v4 response envelope
//!
//! Every API answer is wrapped as
//!
//! ```json
//! { "success": true, "errors": [], "messages": [], "result": ... }
//! ```
//!
//! For DNS record endpoints `result` is usually an array, but single-record
//! answers collapse it to a bare object, and failed calls send `null`. All
//! three shapes normalize to an ordered `Vec<DnsRecord>`.

use dyndns_core::{ApiError, DnsRecord, Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Outer response wrapper
#[derive(Debug, Deserialize)]
pub struct ProviderResponse<T> {
    pub success: bool,

    #[serde(default)]
    pub errors: Vec<ApiError>,

    /// Only meaningful when `success` is true
    #[serde(default)]
    pub result: T,

    /// Informational messages; their shape varies between endpoints
    #[serde(default)]
    pub messages: Vec<Value>,
}

/// Record list that accepts an array, a single object or `null`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecords(pub Vec<DnsRecord>);

impl<'de> Deserialize<'de> for DnsRecords {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::default()),
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<DnsRecord>, _>>()
                .map(Self)
                .map_err(D::Error::custom),
            object @ Value::Object(_) => serde_json::from_value(object)
                .map(|record| Self(vec![record]))
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "DnsRecords: data is neither an array nor a single object (got {other})"
            ))),
        }
    }
}

impl From<DnsRecords> for Vec<DnsRecord> {
    fn from(records: DnsRecords) -> Self {
        records.0
    }
}

/// Decode a DNS records response body
///
/// # Returns
///
/// - `Ok(Vec<DnsRecord>)`: `success=true`, records in response order
/// - `Err(Error::Api)`: `success=false`, the `errors` array unchanged
/// - `Err(Error::Decode)`: the body is not an envelope
pub fn decode_records(status: u16, body: &[u8]) -> Result<Vec<DnsRecord>> {
    let envelope: ProviderResponse<DnsRecords> = serde_json::from_slice(body).map_err(|e| {
        Error::decode(format!(
            "Failed to parse Cloudflare response (HTTP {status}): {e}"
        ))
    })?;

    if !envelope.success {
        return Err(Error::api(envelope.errors));
    }

    Ok(envelope.result.into())
}
