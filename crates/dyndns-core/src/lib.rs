// # dyndns-core
//
// Core library for the polling DDNS reconciler.
//
// ## Architecture Overview
//
// This library keeps a single DNS address record in sync with the machine's
// current public IP address:
//
// - **PublicIpResolver**: Trait for determining the current public IP
// - **RecordGateway**: Trait for listing, creating and updating DNS records
//   via a provider API
// - **Reconciler**: Pure decision logic that converges the remote record to
//   the resolved IP (no-op, update or create; never more than one mutating
//   call per cycle)
// - **UpdateEngine**: Fixed-interval scheduler that drives the reconciler
//   forever and isolates each cycle's failures
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from provider
//    and resolver implementations
// 2. **Polling**: One reconciliation cycle per tick, strictly sequential
// 3. **Failure Isolation**: A bad cycle is logged and retried on the next
//    tick; only startup-time failures terminate the process
// 4. **Library-First**: The daemon binary is a thin shell over this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use config::DdnsConfig;
pub use engine::{CycleOutcome, UpdateEngine, DEFAULT_POLL_INTERVAL};
pub use error::{Error, Result};
pub use reconciler::{FailureReason, ReconcileOutcome, Reconciler};
pub use traits::{DnsRecord, PublicIpResolver, RecordGateway};
