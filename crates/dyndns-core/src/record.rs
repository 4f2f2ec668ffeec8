//! DNS record model and address classification
//!
//! Records are request-scoped: they are decoded from a provider response,
//! consumed by the reconciler and dropped at the end of the run.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// DNS record type
///
/// Types other than the ones the updater writes are kept verbatim so that a
/// record can be sent back to the provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
    /// CNAME record
    Cname,
    /// Any other record type, as sent by the provider
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Other(other) => other,
        }
    }

    /// Whether this record type holds an address the updater manages
    pub fn is_address(&self) -> bool {
        matches!(self, RecordType::A | RecordType::Aaaa)
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            _ => RecordType::Other(value),
        }
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record as exchanged with the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier
    pub id: String,

    /// Fully qualified record name (e.g. "home.example.com")
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record target; the address for A/AAAA records
    pub content: String,

    /// Whether traffic is proxied by the provider
    #[serde(default)]
    pub proxied: bool,

    /// Time-to-live, 1 means "automatic"
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Free-form comment; `null` and absent both decode as `None`
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub comment: Option<String>,
}

impl DnsRecord {
    /// Copy of this record pointed at `ip`, with the type derived from its family
    pub fn retargeted(&self, ip: &ResolvedIp, comment: impl Into<String>) -> Self {
        Self {
            content: ip.address.clone(),
            record_type: ip.record_type(),
            comment: Some(comment.into()),
            ..self.clone()
        }
    }
}

fn default_ttl() -> u32 {
    1
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|comment| !comment.is_empty()))
}

/// Address family of a resolved IP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Record type that stores an address of this family
    pub fn record_type(self) -> RecordType {
        match self {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::Aaaa,
        }
    }
}

/// Classify an address string by family.
///
/// Anything containing a `.` is treated as IPv4, everything else as IPv6.
/// This is a substring check, not address parsing: `"not-an-ip"` comes out as
/// IPv6. Swap this function for `str::parse::<IpAddr>()` if real validation is
/// ever wanted.
pub fn classify_address(address: &str) -> AddressFamily {
    if address.contains('.') {
        AddressFamily::V4
    } else {
        AddressFamily::V6
    }
}

/// The public address records should point at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIp {
    pub address: String,
    pub is_ipv4: bool,
}

impl ResolvedIp {
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let is_ipv4 = classify_address(&address) == AddressFamily::V4;
        Self { address, is_ipv4 }
    }

    pub fn family(&self) -> AddressFamily {
        if self.is_ipv4 {
            AddressFamily::V4
        } else {
            AddressFamily::V6
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.family().record_type()
    }
}

impl fmt::Display for ResolvedIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}
