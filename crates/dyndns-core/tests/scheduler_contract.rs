//! Contract Test: Scheduler Loop
//!
//! Verifies the loop-level guarantees:
//! - A failed IP resolution skips the cycle without invoking the reconciler
//! - A failed cycle does not prevent the next cycle from running
//! - A zero interval is substituted with the safe default
//!
//! Loop tests run under tokio paused time, so N cycles take no wall-clock
//! time.

mod common;

use std::time::Duration;

use common::*;
use dyndns_core::engine::{CycleOutcome, UpdateEngine, DEFAULT_POLL_INTERVAL};
use dyndns_core::reconciler::{ReconcileOutcome, Reconciler};

fn engine_with(
    resolver: &ScriptedResolver,
    gateway: &RecordingGateway,
    interval: Duration,
) -> UpdateEngine {
    UpdateEngine::new(
        Box::new(resolver.clone()),
        Box::new(gateway.clone()),
        Reconciler::new("example.com", "*", "A"),
        interval,
    )
}

#[tokio::test]
async fn resolver_failure_skips_reconciliation() {
    let resolver = ScriptedResolver::new(ip("1.2.3.4"));
    resolver.push_err("HTTP request failed with status 503");
    let gateway = RecordingGateway::with_records(vec![record("r1", "*", "A", "1.2.3.4")]);

    let engine = engine_with(&resolver, &gateway, Duration::from_secs(60));
    let outcome = engine.run_once().await;

    assert!(matches!(outcome, CycleOutcome::Skipped(_)));
    // The reconciler was never invoked: no gateway traffic at all.
    assert_eq!(gateway.list_call_count(), 0);
    assert_eq!(gateway.mutating_call_count(), 0);
}

#[tokio::test]
async fn successful_cycle_reports_reconcile_outcome() {
    let resolver = ScriptedResolver::new(ip("1.2.3.4"));
    let gateway = RecordingGateway::with_records(vec![record("r1", "*", "A", "1.2.3.4")]);

    let engine = engine_with(&resolver, &gateway, Duration::from_secs(60));
    let outcome = engine.run_once().await;

    assert!(matches!(
        outcome,
        CycleOutcome::Completed(ReconcileOutcome::NoUpdateNeeded)
    ));
    assert_eq!(gateway.list_call_count(), 1);
    assert_eq!(gateway.mutating_call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_cycle_does_not_prevent_the_next_one() {
    let resolver = ScriptedResolver::new(ip("1.2.3.4"));
    resolver.push_err("transient lookup failure");
    // Second cycle succeeds via the fallback address.

    let gateway = RecordingGateway::with_records(vec![record("r1", "*", "A", "1.2.3.4")]);

    let engine = engine_with(&resolver, &gateway, Duration::from_secs(60));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    // Paused time: this fast-forwards through one full interval, letting the
    // loop run its cycle at t=0 (skipped) and at t=60s (successful).
    tokio::time::sleep(Duration::from_secs(90)).await;

    shutdown_tx.send(()).expect("engine still running");
    handle.await.expect("engine task completes");

    assert_eq!(resolver.call_count(), 2, "both cycles ran");
    assert_eq!(
        gateway.list_call_count(),
        1,
        "only the successful cycle reached the gateway"
    );
    assert_eq!(gateway.mutating_call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn cycles_run_once_per_interval() {
    let resolver = ScriptedResolver::new(ip("1.2.3.4"));
    let gateway = RecordingGateway::with_records(vec![record("r1", "*", "A", "1.2.3.4")]);

    let engine = engine_with(&resolver, &gateway, Duration::from_secs(60));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    // Three intervals of virtual time → cycles at t=0, 60, 120, 180.
    tokio::time::sleep(Duration::from_secs(210)).await;

    shutdown_tx.send(()).expect("engine still running");
    handle.await.expect("engine task completes");

    assert_eq!(resolver.call_count(), 4);
    assert_eq!(gateway.list_call_count(), 4);
    // All cycles saw an unchanged IP: still zero writes after many cycles.
    assert_eq!(gateway.mutating_call_count(), 0);
}

#[tokio::test]
async fn zero_interval_is_substituted_with_default() {
    let resolver = ScriptedResolver::new(ip("1.2.3.4"));
    let gateway = RecordingGateway::new();

    let engine = engine_with(&resolver, &gateway, Duration::ZERO);

    assert_eq!(engine.poll_interval(), DEFAULT_POLL_INTERVAL);
}
