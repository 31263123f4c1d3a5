// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync reconciler.
//!
//! Replays the operation log against the catalog API:
//! - In enqueue order, one call at a time
//! - Stopping at the first failure
//! - Removing exactly the acknowledged prefix from the log
//!
//! Each pass starts from the queue as stored. Operations appended while a
//! pass is running are not part of its snapshot and wait for the next pass.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shelf_core::{Action, Operation, ProductId};

use super::monitor::ConnectivityMonitor;
use super::queue::{lock, QueueError, SharedLog};
use super::transport::{RemoteCall, Transport, TransportError};

/// Timing settings for the sync subsystem.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Upper bound for each remote call (and each probe).
    pub request_timeout: Duration,
    /// Interval between health probes.
    pub probe_interval: Duration,
    /// Interval between network reachability checks.
    pub network_check_interval: Duration,
    /// Initial delay for the post-failure probe backoff (milliseconds).
    pub initial_delay_ms: u64,
    /// Maximum delay for the post-failure probe backoff (seconds).
    pub max_delay_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            request_timeout: Duration::from_secs(10),
            probe_interval: Duration::from_secs(30),
            network_check_interval: Duration::from_secs(5),
            initial_delay_ms: 1000,
            max_delay_secs: 30,
        }
    }
}

/// Error type for sync passes.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A queued operation can never be sent.
    #[error("operation {index} cannot be sent: {reason}\n  hint: run 'shelf prune' to drop invalid operations")]
    ValidationFailed { index: usize, reason: String },

    /// The network is unreachable.
    #[error("network unavailable: {0}\n  hint: pending operations stay queued until the connection returns")]
    NetworkUnavailable(String),

    /// The server is unreachable, timed out, or refused an operation.
    #[error("server unavailable: {0}\n  hint: pending operations stay queued until the server recovers")]
    ServerUnavailable(String),

    /// Queue error.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

/// Result type for sync passes.
pub type SyncResult<T> = Result<T, SyncError>;

/// Why a pass did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another pass is running.
    InFlight,
    /// Nothing is queued.
    Empty,
    /// Network or server is down.
    Offline,
}

/// Result of a reconciliation pass that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Skipped(SkipReason),
    Completed {
        /// Number of operations acknowledged and removed.
        applied: usize,
        /// Temporary ids resolved to server ids, in creation order.
        created: Vec<(ProductId, ProductId)>,
    },
}

/// Claims the in-flight flag for the lifetime of a pass.
struct PassGuard<'a>(&'a AtomicBool);

impl<'a> PassGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard(flag))
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drains the operation log against the remote service.
pub struct Reconciler<T: Transport> {
    log: SharedLog,
    monitor: Arc<ConnectivityMonitor>,
    transport: Arc<T>,
    timeout: Duration,
    in_flight: AtomicBool,
}

impl<T: Transport> Reconciler<T> {
    pub fn new(
        log: SharedLog,
        monitor: Arc<ConnectivityMonitor>,
        transport: Arc<T>,
        timeout: Duration,
    ) -> Self {
        Reconciler {
            log,
            monitor,
            transport,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    /// True while a pass is running.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Runs one reconciliation pass.
    ///
    /// Safe to call at any time: a call made while another pass is running,
    /// while offline, or with an empty queue returns [`PassOutcome::Skipped`]
    /// without touching anything.
    pub async fn run(&self) -> SyncResult<PassOutcome> {
        let Some(_guard) = PassGuard::claim(&self.in_flight) else {
            tracing::debug!("sync pass already in flight");
            return Ok(PassOutcome::Skipped(SkipReason::InFlight));
        };

        let snapshot = {
            let mut log = lock(&self.log);
            log.reload()?;
            log.snapshot()
        };
        if snapshot.is_empty() {
            return Ok(PassOutcome::Skipped(SkipReason::Empty));
        }
        if self.monitor.is_offline() {
            tracing::debug!(pending = snapshot.len(), link = %self.monitor.state().link(), "offline, not syncing");
            return Ok(PassOutcome::Skipped(SkipReason::Offline));
        }

        let applied = snapshot.len();
        tracing::info!(pending = applied, "starting sync pass");
        let mut resolved: HashMap<ProductId, ProductId> = HashMap::new();
        let mut created = Vec::new();

        for (index, queued) in snapshot.iter().enumerate() {
            let mut op = queued.clone();
            op.remap(&resolved);

            if !op.is_valid() {
                self.settle_after_failure(&snapshot[..index], &resolved);
                tracing::warn!(index, op = %op, "invalid operation, aborting sync pass");
                return Err(SyncError::ValidationFailed {
                    index,
                    reason: format!("{} requires a non-empty name", op.op_type()),
                });
            }

            let call = RemoteCall::for_operation(&op);
            let result = tokio::time::timeout(self.timeout, self.transport.execute(call))
                .await
                .unwrap_or(Err(TransportError::Timeout));

            match result {
                Ok(reply) => {
                    if let Action::Create {
                        local_id: Some(local_id),
                        ..
                    } = op.action
                    {
                        match reply.created_id() {
                            Some(server_id) => {
                                resolved.insert(local_id, server_id);
                                created.push((local_id, server_id));
                            }
                            None => {
                                tracing::warn!(local_id, "server did not return an id for the created product");
                            }
                        }
                    }
                    tracing::debug!(index, op = %op, status = reply.status, "applied operation");
                }
                Err(e) => {
                    self.settle_after_failure(&snapshot[..index], &resolved);
                    tracing::warn!(index, op = %op, error = %e, "sync pass failed");
                    return Err(self.mark_unavailable(e));
                }
            }
        }

        lock(&self.log).acknowledge(&snapshot, &resolved)?;
        tracing::info!(applied, "sync pass completed");
        Ok(PassOutcome::Completed { applied, created })
    }

    /// Removes the acknowledged prefix after a failed pass.
    ///
    /// A storage failure here only means the prefix is sent again later.
    fn settle_after_failure(&self, sent: &[Operation], resolved: &HashMap<ProductId, ProductId>) {
        if let Err(e) = lock(&self.log).acknowledge(sent, resolved) {
            tracing::warn!(error = %e, acknowledged = sent.len(), "could not remove acknowledged operations");
        }
    }

    fn mark_unavailable(&self, error: TransportError) -> SyncError {
        self.monitor.set_server_down(true);
        if error.is_unreachable() {
            self.monitor.set_network_down(true);
            SyncError::NetworkUnavailable(error.to_string())
        } else {
            SyncError::ServerUnavailable(error.to_string())
        }
    }
}
