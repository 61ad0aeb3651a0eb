//! Retry policy tests: a pass that yields nothing is re-run, bounded by
//! `max_retries` and the per-server deadline.

mod common;

use std::sync::atomic::Ordering;

use fleet_health::model::Severity;

#[tokio::test]
async fn a_transient_failure_recovers_on_the_retry_pass() {
    let (addr, state) = common::start_flaky_ilo(1).await;
    let mut config = common::test_config(2, 1000, 10_000);
    config.retries.max_retries = 1;
    let engine = common::engine(&config);

    let results = engine
        .scan(vec![common::target("web-01", "prod", addr)])
        .await;

    let result = &results[0];
    assert!(
        !result.is_total_failure(),
        "The retry pass should have recovered, got: {:?}",
        result.rows
    );
    assert_eq!(result.worst_severity(), Severity::Normal);
    // Failed probe, successful probe, then the collection fetch.
    assert_eq!(state.system_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn a_dead_server_is_retried_exactly_once() {
    let (addr, state) = common::start_flaky_ilo(u32::MAX).await;
    let mut config = common::test_config(2, 1000, 10_000);
    config.retries.max_retries = 1;
    let engine = common::engine(&config);

    let results = engine
        .scan(vec![common::target("web-01", "prod", addr)])
        .await;

    let result = &results[0];
    assert!(result.is_total_failure());
    let detail = result.rows[0].detail.as_deref().unwrap_or("");
    assert!(
        detail.contains("protocol undetermined"),
        "Cause should name the failed detection, got: {detail}"
    );
    // One probe per pass: the first pass plus the single retry.
    assert_eq!(state.system_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn no_retry_happens_when_retries_are_disabled() {
    let (addr, state) = common::start_flaky_ilo(u32::MAX).await;
    let config = common::test_config(2, 1000, 10_000);
    let engine = common::engine(&config);

    let results = engine
        .scan(vec![common::target("web-01", "prod", addr)])
        .await;

    assert!(results[0].is_total_failure());
    assert_eq!(state.system_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn partial_results_are_not_retried() {
    // Thermal drilldown fails, but the pass still produced device rows.
    let (addr, state) = common::start_degraded_idrac(true).await;
    let mut config = common::test_config(2, 1000, 10_000);
    config.retries.max_retries = 1;
    let engine = common::engine(&config);

    let results = engine
        .scan(vec![common::target("db-01", "prod", addr)])
        .await;

    assert!(!results[0].is_total_failure());
    assert_eq!(
        state.sessions_opened.load(Ordering::SeqCst),
        1,
        "A pass with device rows must not be re-run"
    );
}
