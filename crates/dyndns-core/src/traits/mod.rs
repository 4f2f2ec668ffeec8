//! Core traits for cloudflare-dyndns
//!
//! This module defines the seams between the reconciliation logic and its
//! network collaborators.
//!
//! - [`IpResolver`]: Discover the current public IP address
//! - [`DnsProvider`]: List and update DNS records via a provider API

pub mod dns_provider;
pub mod ip_resolver;

pub use dns_provider::DnsProvider;
pub use ip_resolver::IpResolver;
