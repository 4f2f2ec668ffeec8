// # dyndns-core
//
// Core library for cloudflare-dyndns.
//
// ## Architecture Overview
//
// This library holds the decision logic of the updater; transports live in
// their own crates and plug in through the traits defined here:
// - **IpResolver**: Trait for discovering the current public IP address
// - **DnsProvider**: Trait for listing and updating records via a provider API
// - **RetryPolicy**: Bounded retry with jittered exponential backoff (owned by resolvers)
// - **Reconciler**: Diffs desired record names against the provider and applies the minimal update set
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP transports
// 2. **Explicit Configuration**: No process-wide state, config values are passed in
// 3. **Structured Outcomes**: The core reports, the binary renders
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Idempotency**: Records that already match are never touched

pub mod config;
pub mod error;
pub mod reconciler;
pub mod record;
pub mod retry;
pub mod traits;

// Re-export core types for convenience
pub use config::{CloudflareConfig, DyndnsConfig, IpifyConfig, MainConfig};
pub use error::{ApiError, Error, Result};
pub use reconciler::{
    ReconcileReport, Reconciler, RecordOutcome, RecordReport, UpdateFailurePolicy,
    default_comment,
};
pub use record::{AddressFamily, DnsRecord, RecordType, ResolvedIp, classify_address};
pub use retry::{ExponentialBackoff, RetryPolicy};
pub use traits::{DnsProvider, IpResolver};
