// # DNS Record Gateway Trait
//
// Defines the interface for reading and mutating address records via a DNS
// provider's API.
//
// ## Implementations
//
// - DNSPod: `dyndns-provider-dnspod` crate
// - Future: Cloudflare, Route53, Gandi, etc.
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::RecordGateway;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let gateway = /* RecordGateway implementation */;
//
//     for record in gateway.list_records("example.com").await? {
//         println!("{} {} -> {}", record.record_type, record.host_prefix, record.value);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::error::Result;

/// A DNS record as reported by the remote provider.
///
/// The provider owns this entity; the reconciler only reads it and
/// conditionally mutates it through the [`RecordGateway`]. Records are never
/// cached across reconciliation cycles; the authoritative set is re-fetched
/// every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Provider-assigned record identifier, used for updates
    pub id: String,
    /// The host label ("RR") portion, e.g. "*" or "www"
    pub host_prefix: String,
    /// Record type, e.g. "A"
    pub record_type: String,
    /// Record value; an IP address string for address records. May be empty
    /// or malformed on the provider side; the reconciler treats such a value
    /// as simply out of date.
    pub value: String,
}

impl DnsRecord {
    /// Whether this record matches a `(record_type, host_prefix)` selection key.
    pub fn matches(&self, record_type: &str, host_prefix: &str) -> bool {
        self.record_type == record_type && self.host_prefix == host_prefix
    }
}

/// Trait for DNS record gateway implementations
///
/// This trait defines the capability interface the reconciler uses to talk to
/// a DNS provider. Implementations handle the specifics of the provider's
/// wire format and nothing else.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Responsibility Boundary
///
/// Gateways are transport bindings, not decision-makers:
///
/// - They perform exactly one API call per method invocation
/// - They surface provider errors verbatim (network, auth, rate-limit,
///   validation) without retrying or interpreting them; retry policy is
///   owned by the scheduler, whose polling interval IS the retry interval
/// - They never decide whether an update is needed (owned by [`Reconciler`])
/// - They never cache records between calls
///
/// [`Reconciler`]: crate::reconciler::Reconciler
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// List all records for a domain, in provider-returned order.
    ///
    /// Order matters: when more than one record carries the same selection
    /// key, the reconciler deterministically picks the first match.
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>>;

    /// Create a new address record for `host_prefix.domain` with the given value.
    async fn create_record(
        &self,
        domain: &str,
        host_prefix: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()>;

    /// Update an existing record, addressed by its provider identifier.
    ///
    /// `host_prefix` and `record_type` must be the *existing* record's
    /// values; callers preserve them, only `value` changes.
    async fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        host_prefix: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()>;
}
