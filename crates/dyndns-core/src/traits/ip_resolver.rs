// # IP Resolver Trait
//
// Defines the interface for discovering the caller's public IP address.
//
// ## Implementations
//
// - HTTP IP echo (ipify): `dyndns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::{IpResolver, ResolvedIp};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     let ip = ResolvedIp::new(resolver.resolve().await?);
//     println!("public address: {ip}");
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP resolver implementations
///
/// # Retry Ownership
///
/// Unlike [`DnsProvider`](crate::DnsProvider), a resolver owns its retry
/// loop: IP echo services are unreliable and cheap to ask again. Callers
/// must treat an error from [`resolve`](IpResolver::resolve) as terminal and
/// not retry on top of it.
///
/// # Output
///
/// The returned string is the echo service's answer, trimmed, without any
/// syntactic validation. Classification happens in
/// [`ResolvedIp::new`](crate::ResolvedIp::new).
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The address reported by the echo service
    /// - `Err(Error::IpUnresolved)`: All attempts failed
    async fn resolve(&self) -> Result<String, crate::Error>;
}
