//! Configuration types for cloudflare-dyndns
//!
//! This module defines the configuration value handed to every component.
//! Loading it from disk is the binary's job; the core only validates it.

use serde::{Deserialize, Serialize};

/// Cloudflare API v4 base URL
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default IP echo endpoint (answers over IPv4 or IPv6)
pub const DEFAULT_IPIFY_URL: &str = "https://api64.ipify.org";

/// Default User-Agent sent to both endpoints
pub const DEFAULT_USER_AGENT: &str = "cloudflare-dyndns/1.0.0";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DyndnsConfig {
    /// General settings
    #[serde(default)]
    pub main: MainConfig,

    /// DNS provider settings
    #[serde(default)]
    pub cloudflare: CloudflareConfig,

    /// IP echo service settings
    #[serde(default)]
    pub ipify: IpifyConfig,
}

impl DyndnsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.cloudflare.validate()?;
        self.ipify.validate()?;

        if self.main.user_agent.trim().is_empty() {
            return Err(crate::Error::config("main.user_agent cannot be empty"));
        }

        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainConfig {
    /// User-Agent header for every outgoing request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory receiving `cloudflare-dyndns.log`; empty disables the log file
    #[serde(default = "default_log_file_path")]
    pub log_file_path: String,

    /// Gateway address of the home network; empty disables the gateway check
    #[serde(default)]
    pub home_gateway: String,
}

impl MainConfig {
    /// The configured home gateway, if any
    pub fn home_gateway(&self) -> Option<&str> {
        let gateway = self.home_gateway.trim();
        (!gateway.is_empty()).then_some(gateway)
    }
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            log_file_path: default_log_file_path(),
            home_gateway: String::new(),
        }
    }
}

/// Cloudflare settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudflareConfig {
    /// API token with Zone:DNS:Edit permission
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub api_token: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Zone holding the records
    #[serde(default)]
    pub zone_id: String,

    /// Names of the records to keep up to date
    #[serde(default)]
    pub update_records: Vec<String>,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("zone_id", &self.zone_id)
            .field("update_records", &self.update_records)
            .finish()
    }
}

impl CloudflareConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.trim().is_empty() {
            return Err(crate::Error::config("cloudflare.api_token is required"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("cloudflare.zone_id is required"));
        }
        if self.update_records.iter().all(|name| name.trim().is_empty()) {
            return Err(crate::Error::config(
                "cloudflare.update_records must contain at least one record name",
            ));
        }
        validate_http_url("cloudflare.base_url", &self.base_url)
    }
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_base_url(),
            zone_id: String::new(),
            update_records: Vec::new(),
        }
    }
}

/// IP echo service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpifyConfig {
    /// URL answering with the caller's IP as plain text
    #[serde(default = "default_ipify_url")]
    pub url: String,
}

impl IpifyConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_http_url("ipify.url", &self.url)
    }
}

impl Default for IpifyConfig {
    fn default() -> Self {
        Self {
            url: default_ipify_url(),
        }
    }
}

fn validate_http_url(key: &str, url: &str) -> Result<(), crate::Error> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{key} must use HTTP or HTTPS scheme. Got: {url}"
        )));
    }
    Ok(())
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_log_file_path() -> String {
    "./".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_ipify_url() -> String {
    DEFAULT_IPIFY_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DyndnsConfig {
        DyndnsConfig {
            cloudflare: CloudflareConfig {
                api_token: "token".to_string(),
                zone_id: "zone".to_string(),
                update_records: vec!["home.example.com".to_string()],
                ..CloudflareConfig::default()
            },
            ..DyndnsConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = DyndnsConfig::default();

        assert_eq!(config.cloudflare.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ipify.url, DEFAULT_IPIFY_URL);
        assert_eq!(config.main.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.main.log_file_path, "./");
        assert_eq!(config.main.home_gateway(), None);
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_required_values() {
        let mut config = valid_config();
        config.cloudflare.api_token.clear();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.cloudflare.zone_id = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.cloudflare.update_records.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_scheme_is_checked() {
        let mut config = valid_config();
        config.ipify.url = "ftp://ipify.example".to_string();
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let mut config = valid_config();
        config.cloudflare.api_token = "secret_token_12345".to_string();

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn test_home_gateway_is_trimmed() {
        let main = MainConfig {
            home_gateway: " 192.168.1.1 ".to_string(),
            ..MainConfig::default()
        };
        assert_eq!(main.home_gateway(), Some("192.168.1.1"));
    }
}
