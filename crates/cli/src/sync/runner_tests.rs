// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the sync runner.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use super::monitor::ConnectivityMonitor;
use super::queue::{lock, SharedLog};
use super::reconciler::{Reconciler, SyncConfig};
use super::runner::*;
use super::test_helpers::{create, delete, online_monitor, shared_log};
use super::transport_tests::MockTransport;

const HOUR: Duration = Duration::from_secs(3600);

fn test_config() -> SyncConfig {
    SyncConfig {
        request_timeout: Duration::from_secs(1),
        probe_interval: HOUR,
        network_check_interval: HOUR,
        initial_delay_ms: 10,
        max_delay_secs: 1,
    }
}

fn runner(
    log: &SharedLog,
    monitor: &Arc<ConnectivityMonitor>,
    transport: &Arc<MockTransport>,
    config: SyncConfig,
) -> SyncRunner<MockTransport> {
    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(log),
        Arc::clone(monitor),
        Arc::clone(transport),
        config.request_timeout,
    ));
    SyncRunner::new(reconciler, Arc::clone(monitor), config)
}

/// Polls `cond` until it holds, failing after a few seconds.
async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

/// Lets the runner consume pass results before it is cancelled.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_kickoff_pass_when_online() {
    let (_store, log) = shared_log();
    lock(&log).append(create("Ball")).unwrap();
    lock(&log).append(delete(7)).unwrap();

    let monitor = online_monitor();
    let transport = MockTransport::shared();
    let runner = runner(&log, &monitor, &transport, test_config());
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    wait_until(|| lock(&log).is_empty()).await;
    settle().await;

    cancel.cancel();
    let stats = handle.await.unwrap();
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.failures, 0);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_waits_for_network_then_syncs() {
    let (_store, log) = shared_log();
    lock(&log).append(create("Ball")).unwrap();

    let monitor = Arc::new(ConnectivityMonitor::new(true));
    let transport = MockTransport::shared();
    let runner = runner(&log, &monitor, &transport, test_config());
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(transport.calls().is_empty());
    assert_eq!(lock(&log).len(), 1);

    monitor.set_network_down(false);
    wait_until(|| lock(&log).is_empty()).await;

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_failed_pass_probes_again_and_recovers() {
    let (_store, log) = shared_log();
    lock(&log).append(create("Ball")).unwrap();

    let monitor = online_monitor();
    let transport = MockTransport::shared();
    transport.push_status(500);

    let runner = runner(&log, &monitor, &transport, test_config());
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    // First pass fails, backoff probe brings the server back, second pass drains
    wait_until(|| lock(&log).is_empty()).await;
    assert!(transport.probe_count() >= 1);
    assert!(!monitor.is_server_down());
    settle().await;

    cancel.cancel();
    let stats = handle.await.unwrap();
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.applied, 1);
}

#[tokio::test]
async fn test_backoff_keeps_probing_while_server_down() {
    let (_store, log) = shared_log();
    lock(&log).append(create("Ball")).unwrap();

    let monitor = online_monitor();
    let transport = MockTransport::shared();
    transport.push_status(503);
    transport.set_probe_down(true);

    let runner = runner(&log, &monitor, &transport, test_config());
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    wait_until(|| transport.probe_count() >= 3).await;
    assert!(monitor.is_server_down());
    assert_eq!(lock(&log).len(), 1);

    transport.set_probe_down(false);
    wait_until(|| lock(&log).is_empty()).await;

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_periodic_probe_updates_server_flag() {
    let (_store, log) = shared_log();
    let monitor = online_monitor();
    let transport = MockTransport::shared();
    transport.set_probe_down(true);

    let config = SyncConfig {
        probe_interval: Duration::from_millis(20),
        ..test_config()
    };
    let runner = runner(&log, &monitor, &transport, config);
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    wait_until(|| monitor.is_server_down()).await;
    transport.set_probe_down(false);
    wait_until(|| !monitor.is_server_down()).await;

    cancel.cancel();
    let stats = handle.await.unwrap();
    assert!(stats.probes >= 2);
}

#[tokio::test]
async fn test_probe_while_up_does_not_start_a_pass() {
    let (_store, log) = shared_log();
    let monitor = online_monitor();
    let transport = MockTransport::shared();

    let config = SyncConfig {
        probe_interval: Duration::from_millis(10),
        ..test_config()
    };
    let runner = runner(&log, &monitor, &transport, config);
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    // Kickoff pass finds nothing; intents queued afterwards wait for a transition
    settle().await;
    lock(&log).append(delete(7)).unwrap();
    wait_until(|| transport.probe_count() >= 3).await;
    assert!(transport.calls().is_empty());
    assert_eq!(lock(&log).len(), 1);

    // Leaving and re-entering Up drains it
    monitor.set_server_down(true);
    monitor.set_server_down(false);
    wait_until(|| lock(&log).is_empty()).await;

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_invalid_operation_does_not_retry() {
    let (_store, log) = shared_log();
    lock(&log)
        .append(shelf_core::Action::create(shelf_core::ProductPayload::named("")))
        .unwrap();

    let monitor = online_monitor();
    let transport = MockTransport::shared();
    let runner = runner(&log, &monitor, &transport, test_config());
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    let stats = handle.await.unwrap();

    assert_eq!(stats.failures, 1);
    assert_eq!(transport.probe_count(), 0);
    assert!(transport.calls().is_empty());
    assert!(!monitor.is_offline());
}

#[tokio::test]
async fn test_cancel_stops_runner() {
    let (_store, log) = shared_log();
    let monitor = online_monitor();
    let transport = MockTransport::shared();
    let runner = runner(&log, &monitor, &transport, test_config());
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());

    cancel.cancel();
    let stats = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.applied, 0);
}
