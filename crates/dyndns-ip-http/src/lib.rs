// # HTTP IP Resolver
//
// This crate asks an ipify-style echo service for the caller's public IP.
//
// ## Protocol
//
// `GET {url}` answers with the address as the raw body, e.g. `93.184.216.34`.
//
// ## Retry
//
// Echo services fail transiently, so every call to `resolve()` runs a
// bounded retry loop driven by a [`RetryPolicy`]:
//
// - each attempt has its own timeout
// - any failure (transport, timeout, non-200, unreadable or empty body)
//   sleeps for the policy's backoff before the next attempt
// - no sleep after the final attempt
// - exhaustion yields `Error::IpUnresolved`
//
// The body is returned trimmed but otherwise verbatim. Whether it is a
// syntactically valid address is not checked here.

use async_trait::async_trait;
use dyndns_core::config::DyndnsConfig;
use dyndns_core::traits::IpResolver;
use dyndns_core::{Error, Result, RetryPolicy};
use reqwest::StatusCode;
use reqwest::header::USER_AGENT;

/// HTTP IP-echo resolver with bounded retry
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// Echo endpoint
    url: String,

    /// User-Agent header value
    user_agent: String,

    /// HTTP client, shared by all attempts
    client: reqwest::Client,

    /// Attempt budget and backoff curve
    policy: RetryPolicy,
}

impl HttpIpResolver {
    /// Create a resolver from the validated configuration with the default policy
    pub fn new(config: &DyndnsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(
            client,
            config.ipify.url.clone(),
            config.main.user_agent.clone(),
        ))
    }

    /// Create a resolver around an existing `reqwest::Client`
    pub fn with_client(
        client: reqwest::Client,
        url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
            client,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// One request against the echo service
    ///
    /// The error string describes why this attempt does not count as an answer.
    async fn attempt(&self) -> std::result::Result<String, String> {
        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.policy.attempt_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("request timed out after {:?}", self.policy.attempt_timeout)
                } else {
                    format!("request failed: {e}")
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read response body: {e}"))?;

        if status != StatusCode::OK {
            return Err(format!("unexpected HTTP status {status}"));
        }

        let address = body.trim();
        if address.is_empty() {
            return Err("empty response body".to_string());
        }

        Ok(address.to_string())
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<String> {
        let mut attempt = 0;

        loop {
            tracing::debug!(
                "Resolving public IP via {} (attempt {}/{})",
                self.url,
                attempt + 1,
                self.policy.max_attempts
            );

            let last_error = match self.attempt().await {
                Ok(address) => {
                    tracing::debug!("Echo service answered {}", address);
                    return Ok(address);
                }
                Err(reason) => reason,
            };

            let Some(delay) = self.policy.delay_after(attempt) else {
                tracing::error!(
                    "Could not resolve public IP after {} attempt(s): {}",
                    attempt + 1,
                    last_error
                );
                return Err(Error::IpUnresolved {
                    attempts: attempt + 1,
                    last_error,
                });
            };

            tracing::warn!(
                "IP lookup attempt {}/{} failed: {}, retrying in {:?}",
                attempt + 1,
                self.policy.max_attempts,
                last_error,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
