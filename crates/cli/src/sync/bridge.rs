// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The surface the UI layer talks to.
//!
//! Delegates to the operation log and the connectivity monitor, and tells
//! subscribers the new queue length after every change it makes.

use std::sync::{Arc, Mutex, PoisonError};

use shelf_core::{Action, ConnectivityState, Operation};
use tokio::sync::mpsc;

use super::monitor::{ConnectivityMonitor, StatusChange};
use super::queue::{lock, QueueResult, SharedLog};

pub struct QueueBridge {
    log: SharedLog,
    monitor: Arc<ConnectivityMonitor>,
    observers: Mutex<Vec<mpsc::UnboundedSender<usize>>>,
}

impl QueueBridge {
    pub fn new(log: SharedLog, monitor: Arc<ConnectivityMonitor>) -> Self {
        QueueBridge {
            log,
            monitor,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Records an intent for later replay.
    pub fn enqueue(&self, action: Action) -> QueueResult<Operation> {
        let (op, pending) = {
            let mut log = lock(&self.log);
            let op = log.append(action)?;
            (op, log.len())
        };
        self.notify(pending);
        Ok(op)
    }

    pub fn snapshot(&self) -> Vec<Operation> {
        lock(&self.log).snapshot()
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.log).len()
    }

    pub fn current_status(&self) -> ConnectivityState {
        self.monitor.state()
    }

    pub fn is_offline(&self) -> bool {
        self.monitor.is_offline()
    }

    /// Receives the queue length after each change made through the bridge.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<usize> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Receives connectivity changes.
    pub fn subscribe_status(&self) -> mpsc::UnboundedReceiver<StatusChange> {
        self.monitor.subscribe()
    }

    /// Removes operations that can never be sent.
    pub fn prune_invalid(&self) -> QueueResult<usize> {
        let (removed, pending) = {
            let mut log = lock(&self.log);
            let removed = log.prune_invalid()?;
            (removed, log.len())
        };
        if removed > 0 {
            self.notify(pending);
        }
        Ok(removed)
    }

    /// Drops every pending operation. Returns how many were dropped.
    pub fn clear(&self) -> QueueResult<usize> {
        let dropped = lock(&self.log).clear()?;
        if dropped > 0 {
            tracing::info!(dropped, "cleared operation queue");
            self.notify(0);
        }
        Ok(dropped)
    }

    fn notify(&self, pending: usize) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(pending).is_ok());
    }
}
