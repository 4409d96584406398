//! Scheduler loop
//!
//! The [`UpdateEngine`] drives the [`Reconciler`] on a fixed interval,
//! forever:
//!
//! 1. Resolve the current public IP. On failure, log and skip reconciliation
//!    entirely for this cycle; the reconciler is never invoked without an IP.
//! 2. Reconcile the record and report the outcome to the logging sink.
//! 3. Sleep for the configured interval, then repeat.
//!
//! No cycle's failure terminates the loop. There is no fast-retry and no
//! backoff: the polling interval IS the retry interval. Cycles run strictly
//! sequentially on one task; the sleep is the only suspension point besides
//! the two network calls.

use std::net::IpAddr;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use crate::traits::{PublicIpResolver, RecordGateway};

/// Interval substituted when the configured one is zero.
///
/// A zero interval would busy-loop against both remote APIs, so the engine
/// refuses it at construction time.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// What happened in one scheduler tick
#[derive(Debug)]
pub enum CycleOutcome {
    /// IP resolution failed; the reconciler was not invoked
    Skipped(Error),

    /// The reconciler ran and produced an outcome
    Completed(ReconcileOutcome),
}

/// Fixed-interval scheduler around the reconciler
///
/// ## Lifecycle
///
/// 1. Create with [`UpdateEngine::new()`]
/// 2. Start with [`UpdateEngine::run()`]; runs until the process is
///    interrupted
/// 3. Or drive single cycles with [`UpdateEngine::run_once()`] (one-shot
///    mode, cron-style usage)
///
/// ## Failure Handling
///
/// Every per-cycle failure is converted into a logged [`CycleOutcome`];
/// nothing past construction can make `run()` return an error or panic.
pub struct UpdateEngine {
    /// Resolver for the current public IP (fresh per cycle, never cached)
    resolver: Box<dyn PublicIpResolver>,

    /// Gateway to the DNS provider's record API
    gateway: Box<dyn RecordGateway>,

    /// Decision logic for the managed record
    reconciler: Reconciler,

    /// Sleep between cycles; also the retry interval after failed cycles
    poll_interval: Duration,
}

impl UpdateEngine {
    /// Create a new engine.
    ///
    /// A zero `poll_interval` is replaced with [`DEFAULT_POLL_INTERVAL`]
    /// (with a warning) rather than rejected; a misconfigured interval must
    /// not take the updater down or busy-loop it.
    pub fn new(
        resolver: Box<dyn PublicIpResolver>,
        gateway: Box<dyn RecordGateway>,
        reconciler: Reconciler,
        poll_interval: Duration,
    ) -> Self {
        let poll_interval = if poll_interval.is_zero() {
            warn!(
                default_secs = DEFAULT_POLL_INTERVAL.as_secs(),
                "poll interval is zero, substituting default"
            );
            DEFAULT_POLL_INTERVAL
        } else {
            poll_interval
        };

        Self {
            resolver,
            gateway,
            reconciler,
            poll_interval,
        }
    }

    /// The effective polling interval (after zero-substitution).
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run a single reconciliation cycle.
    pub async fn run_once(&self) -> CycleOutcome {
        let ip = match self.resolver.resolve().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!(error = %e, "failed to resolve public IP, skipping cycle");
                return CycleOutcome::Skipped(e);
            }
        };
        debug!(%ip, "resolved public IP");

        let outcome = self.reconciler.reconcile(self.gateway.as_ref(), ip).await;
        self.report(ip, &outcome);
        CycleOutcome::Completed(outcome)
    }

    /// Run the scheduler loop until the process is interrupted (ctrl-c).
    pub async fn run(&self) {
        self.run_internal(None).await;
    }

    /// Map a cycle outcome to its log line.
    ///
    /// `NoUpdateNeeded` is reported distinctly from `Failed` so operators can
    /// tell "nothing changed" apart from "something broke".
    fn report(&self, ip: IpAddr, outcome: &ReconcileOutcome) {
        let domain = self.reconciler.domain();
        match outcome {
            ReconcileOutcome::NoUpdateNeeded => {
                info!(%ip, domain, "record already current, no update needed");
            }
            ReconcileOutcome::Updated {
                record_id,
                previous_value,
            } => {
                info!(%ip, domain, record_id, previous = %previous_value, "record updated");
            }
            ReconcileOutcome::Created => {
                info!(%ip, domain, "record created");
            }
            ReconcileOutcome::Failed(reason) => {
                error!(%ip, domain, error = %reason, "reconciliation failed, retrying next cycle");
            }
        }
    }

    async fn run_internal(&self, shutdown_rx: Option<oneshot::Receiver<()>>) {
        info!(
            domain = self.reconciler.domain(),
            interval_secs = self.poll_interval.as_secs(),
            "starting reconciliation loop"
        );

        if let Some(mut rx) = shutdown_rx {
            // Test mode: wait for provided shutdown signal
            loop {
                self.run_once().await;

                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = &mut rx => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            // Production mode: wait for operator interrupt
            loop {
                self.run_once().await;

                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("interrupt received, stopping loop");
                        break;
                    }
                }
            }
        }
    }

    /// Test-only helper to run the loop with a controlled shutdown signal.
    ///
    /// **TESTING ONLY**: contract tests need to stop the loop after a known
    /// number of cycles. Production code should use `run()` instead, which
    /// stops on operator interrupt.
    pub async fn run_with_shutdown(&self, shutdown_rx: Option<oneshot::Receiver<()>>) {
        self.run_internal(shutdown_rx).await;
    }
}
