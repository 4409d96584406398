// # Public IP Resolver Trait
//
// Defines the interface for determining the machine's current public IP
// address.
//
// ## Implementations
//
// - HTTP lookup against a "what is my IP" endpoint: `dyndns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::PublicIpResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* PublicIpResolver implementation */;
//
//     let ip = resolver.resolve().await?;
//     println!("public IP: {ip}");
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;

/// Trait for public IP resolver implementations
///
/// A resolved address is valid for the duration of one reconciliation cycle
/// only. Implementations must not cache between calls; the scheduler
/// re-resolves fresh each cycle.
///
/// # Responsibility Boundary
///
/// Resolvers make exactly one lookup per call and surface failures as
/// errors. Retry policy is owned by the scheduler: a failed resolution skips
/// the cycle and the next tick retries after the normal polling interval.
#[async_trait]
pub trait PublicIpResolver: Send + Sync {
    /// Resolve the current public IP address.
    async fn resolve(&self) -> Result<IpAddr>;
}
