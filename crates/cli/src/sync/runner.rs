// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running sync loop.
//!
//! Wires the periodic health probe, the network watcher, connectivity
//! transitions and reconciliation passes together. Passes run as spawned
//! tasks so a slow pass never holds up probing; the reconciler's in-flight
//! guard keeps them from overlapping.
//!
//! A pass is scheduled once at start when online, and afterwards only when
//! the monitor enters `Up`. Probes and watcher events just update the flags.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::monitor::ConnectivityMonitor;
use super::network::NetworkWatcher;
use super::reconciler::{PassOutcome, Reconciler, SyncConfig, SyncError, SyncResult};
use super::transport::{Transport, TransportError};

/// Counters reported when the runner stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    pub probes: u64,
    pub passes: u64,
    pub applied: u64,
    pub failures: u64,
}

/// Exponential backoff for the post-failure probe.
#[derive(Debug, Clone)]
struct Backoff {
    initial_ms: u64,
    max_ms: u64,
    next_ms: u64,
}

impl Backoff {
    fn new(initial_ms: u64, max_delay_secs: u64) -> Self {
        let max_ms = max_delay_secs.saturating_mul(1000).max(initial_ms);
        Backoff {
            initial_ms,
            max_ms,
            next_ms: initial_ms,
        }
    }

    /// Returns the delay to wait now and doubles the next one (capped).
    fn next_delay(&mut self) -> Duration {
        let delay = self.next_ms;
        self.next_ms = std::cmp::min(self.next_ms.saturating_mul(2), self.max_ms);
        Duration::from_millis(delay)
    }

    fn reset(&mut self) {
        self.next_ms = self.initial_ms;
    }
}

pub struct SyncRunner<T: Transport + 'static> {
    reconciler: Arc<Reconciler<T>>,
    monitor: Arc<ConnectivityMonitor>,
    config: SyncConfig,
    network: Option<NetworkWatcher>,
    cancel: CancellationToken,
}

impl<T: Transport + 'static> SyncRunner<T> {
    pub fn new(
        reconciler: Arc<Reconciler<T>>,
        monitor: Arc<ConnectivityMonitor>,
        config: SyncConfig,
    ) -> Self {
        SyncRunner {
            reconciler,
            monitor,
            config,
            network: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Feed network reachability from the given watcher.
    pub fn with_network_watcher(mut self, watcher: NetworkWatcher) -> Self {
        self.network = Some(watcher);
        self
    }

    /// Token that stops the runner when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Probes the server once and applies the result.
    ///
    /// Returns true if the server answered.
    pub async fn probe(&self) -> bool {
        let result = tokio::time::timeout(
            self.config.request_timeout,
            self.reconciler.transport().probe(),
        )
        .await
        .unwrap_or(Err(TransportError::Timeout));
        let up = result.is_ok();
        self.monitor.apply_probe(&result);
        up
    }

    fn spawn_pass(&self, results: &mpsc::Sender<SyncResult<PassOutcome>>) {
        let reconciler = Arc::clone(&self.reconciler);
        let results = results.clone();
        tokio::spawn(async move {
            let result = reconciler.run().await;
            let _ = results.send(result).await;
        });
    }

    /// Runs until the cancel token fires.
    pub async fn run(mut self) -> RunnerStats {
        let mut stats = RunnerStats::default();
        let mut backoff = Backoff::new(self.config.initial_delay_ms, self.config.max_delay_secs);

        let mut changes = self.monitor.subscribe();
        let (pass_tx, mut pass_rx) = mpsc::channel(4);
        let (net_tx, mut net_rx) = mpsc::channel(4);
        let watcher = self.network.take().map(|watcher| {
            watcher.spawn(
                self.config.network_check_interval,
                net_tx,
                self.cancel.child_token(),
            )
        });

        let mut probe_timer = tokio::time::interval_at(
            Instant::now() + self.config.probe_interval,
            self.config.probe_interval,
        );
        probe_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let retry = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(retry);
        let mut retry_armed = false;

        tracing::info!(link = %self.monitor.state().link(), "sync runner started");
        if !self.monitor.is_offline() {
            stats.passes += 1;
            self.spawn_pass(&pass_tx);
        }

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,

                _ = probe_timer.tick() => {
                    stats.probes += 1;
                    self.probe().await;
                }

                Some(online) = net_rx.recv() => {
                    self.monitor.set_network_down(!online);
                }

                Some(change) = changes.recv() => {
                    if change.entered_up() {
                        stats.passes += 1;
                        self.spawn_pass(&pass_tx);
                    }
                }

                Some(result) = pass_rx.recv() => match result {
                    Ok(PassOutcome::Completed { applied, .. }) => {
                        stats.applied += applied as u64;
                        backoff.reset();
                    }
                    Ok(PassOutcome::Skipped(reason)) => {
                        tracing::debug!(?reason, "sync pass skipped");
                    }
                    Err(e @ (SyncError::NetworkUnavailable(_) | SyncError::ServerUnavailable(_))) => {
                        stats.failures += 1;
                        let delay = backoff.next_delay();
                        tracing::warn!(error = %e, retry_in_ms = delay.as_millis() as u64, "sync pass failed");
                        retry.as_mut().reset(Instant::now() + delay);
                        retry_armed = true;
                    }
                    Err(e) => {
                        stats.failures += 1;
                        tracing::warn!(error = %e, "sync pass failed");
                    }
                },

                _ = &mut retry, if retry_armed => {
                    retry_armed = false;
                    stats.probes += 1;
                    if !self.probe().await {
                        let delay = backoff.next_delay();
                        tracing::debug!(retry_in_ms = delay.as_millis() as u64, "server still down");
                        retry.as_mut().reset(Instant::now() + delay);
                        retry_armed = true;
                    }
                }
            }
        }

        self.cancel.cancel();
        if let Some(handle) = watcher {
            let _ = handle.await;
        }
        tracing::info!(
            probes = stats.probes,
            passes = stats.passes,
            applied = stats.applied,
            failures = stats.failures,
            "sync runner stopped"
        );
        stats
    }
}
