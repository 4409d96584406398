//! Record reconciliation
//!
//! The [`Reconciler`] is the decision core of the system: given the resolved
//! public IP and the authoritative record set, it converges the managed
//! record to match.
//!
//! ## Decision Flow
//!
//! ```text
//! list_records ──err──▶ Failed(List)
//!      │
//!      ▼
//! first record with matching (type, host prefix)?
//!      │
//!      ├── found, value == current IP ──▶ NoUpdateNeeded   (zero writes)
//!      ├── found, value differs ───────▶ update_record ──▶ Updated | Failed(Update)
//!      └── none ──────────────────────▶ create_record ──▶ Created | Failed(Create)
//! ```
//!
//! Exactly one of {no-op, update, create} happens per cycle, never more than
//! one mutating call. A cycle that detects no IP change performs zero
//! mutating remote calls; this is the key cost- and rate-limit-saving
//! invariant.

use std::net::IpAddr;

use thiserror::Error;
use tracing::debug;

use crate::error::Error;
use crate::traits::RecordGateway;

/// Which step of a reconciliation cycle failed
#[derive(Debug, Error)]
pub enum FailureReason {
    /// Listing the domain's records failed; nothing was mutated
    #[error("listing records failed: {0}")]
    List(#[source] Error),

    /// Updating the existing record failed
    #[error("updating record failed: {0}")]
    Update(#[source] Error),

    /// Creating the missing record failed
    #[error("creating record failed: {0}")]
    Create(#[source] Error),
}

/// Result of one reconciliation cycle
///
/// Cycle-scoped: produced each cycle, reported to the logging sink, never
/// persisted. "Nothing happened because nothing changed" is a normal,
/// frequently-expected outcome and is deliberately distinct from "nothing
/// happened because something broke".
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// The managed record already holds the current IP; no remote write occurred
    NoUpdateNeeded,

    /// The existing record was rewritten with the current IP
    Updated {
        /// Provider identifier of the record that was updated
        record_id: String,
        /// The value the record held before the update
        previous_value: String,
    },

    /// No record matched the selection key, so one was created
    Created,

    /// The cycle failed at the given step; the loop retries next tick
    Failed(FailureReason),
}

impl ReconcileOutcome {
    /// Whether this outcome represents a failed cycle.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Pure decision logic converging one DNS record to the resolved public IP
///
/// The reconciler owns the target's selection key; the
/// `(record_type, host_prefix)` pair identifying "the" record it manages
/// among all records of the domain. If the provider returns more than one
/// record with that key, the first match in provider order wins; this is a
/// deliberate, deterministic policy.
///
/// All failures are converted into [`ReconcileOutcome::Failed`]; reconcile
/// never panics and never propagates an error past the cycle boundary.
#[derive(Debug, Clone)]
pub struct Reconciler {
    domain_name: String,
    host_prefix: String,
    record_type: String,
}

impl Reconciler {
    /// Create a reconciler for one `(domain, host prefix, record type)` target.
    pub fn new(
        domain_name: impl Into<String>,
        host_prefix: impl Into<String>,
        record_type: impl Into<String>,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            host_prefix: host_prefix.into(),
            record_type: record_type.into(),
        }
    }

    /// The domain whose record set this reconciler manages.
    pub fn domain(&self) -> &str {
        &self.domain_name
    }

    /// Run one reconciliation cycle against `gateway` with the freshly
    /// resolved `current_ip`.
    pub async fn reconcile(
        &self,
        gateway: &dyn RecordGateway,
        current_ip: IpAddr,
    ) -> ReconcileOutcome {
        let records = match gateway.list_records(&self.domain_name).await {
            Ok(records) => records,
            Err(e) => return ReconcileOutcome::Failed(FailureReason::List(e)),
        };

        // First match in provider order; an empty list falls through to create.
        let target = records
            .iter()
            .find(|r| r.matches(&self.record_type, &self.host_prefix));

        match target {
            Some(record) if value_is_current(&record.value, current_ip) => {
                debug!(
                    domain = %self.domain_name,
                    host_prefix = %self.host_prefix,
                    ip = %current_ip,
                    "record value already matches current IP"
                );
                ReconcileOutcome::NoUpdateNeeded
            }
            Some(record) => {
                // Preserve the found record's own host prefix and type; only
                // the value changes.
                match gateway
                    .update_record(
                        &self.domain_name,
                        &record.id,
                        &record.host_prefix,
                        &record.record_type,
                        &current_ip.to_string(),
                    )
                    .await
                {
                    Ok(()) => ReconcileOutcome::Updated {
                        record_id: record.id.clone(),
                        previous_value: record.value.clone(),
                    },
                    Err(e) => ReconcileOutcome::Failed(FailureReason::Update(e)),
                }
            }
            None => {
                match gateway
                    .create_record(
                        &self.domain_name,
                        &self.host_prefix,
                        &self.record_type,
                        &current_ip.to_string(),
                    )
                    .await
                {
                    Ok(()) => ReconcileOutcome::Created,
                    Err(e) => ReconcileOutcome::Failed(FailureReason::Create(e)),
                }
            }
        }
    }
}

/// Compare a provider-side record value against the resolved IP.
///
/// Comparison goes through `IpAddr` so that textually different but
/// equivalent forms do not trigger a write. An empty or unparsable value is
/// never "current"; such a record stays eligible for update.
fn value_is_current(value: &str, current_ip: IpAddr) -> bool {
    match value.trim().parse::<IpAddr>() {
        Ok(ip) => ip == current_ip,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_textual_forms_compare_equal() {
        let current: IpAddr = "1.2.3.4".parse().unwrap();

        assert!(value_is_current("1.2.3.4", current));
        assert!(value_is_current(" 1.2.3.4 ", current));
        assert!(!value_is_current("5.6.7.8", current));
    }

    #[test]
    fn malformed_value_is_never_current() {
        let current: IpAddr = "1.2.3.4".parse().unwrap();

        assert!(!value_is_current("", current));
        assert!(!value_is_current("not-an-ip", current));
    }
}
