// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor.
//!
//! Holds the two reachability flags and notifies observers whenever either
//! one changes. Flags are atomics so status reads never block; the observer
//! list sits behind a mutex that is only held while sending.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use shelf_core::{ConnectivityState, Link};
use tokio::sync::mpsc;

use super::transport::TransportResult;

/// A change of the connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: ConnectivityState,
    pub current: ConnectivityState,
}

impl StatusChange {
    /// True when the change brought both flags up.
    ///
    /// This is the only transition that schedules a reconciliation pass.
    pub fn entered_up(&self) -> bool {
        self.previous.link() != Link::Up && self.current.link() == Link::Up
    }
}

/// Shared connectivity flags with an explicit observer list.
pub struct ConnectivityMonitor {
    network_down: AtomicBool,
    server_down: AtomicBool,
    /// Observer list; its lock also serializes flag writes so each change
    /// is reported exactly once.
    observers: Mutex<Vec<mpsc::UnboundedSender<StatusChange>>>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the server assumed reachable.
    pub fn new(network_down: bool) -> Self {
        ConnectivityMonitor {
            network_down: AtomicBool::new(network_down),
            server_down: AtomicBool::new(false),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ConnectivityState {
        ConnectivityState {
            network_down: self.is_network_down(),
            server_down: self.is_server_down(),
        }
    }

    pub fn is_network_down(&self) -> bool {
        self.network_down.load(Ordering::Acquire)
    }

    pub fn is_server_down(&self) -> bool {
        self.server_down.load(Ordering::Acquire)
    }

    pub fn is_offline(&self) -> bool {
        self.state().offline()
    }

    /// Registers an observer. Dropping the receiver unsubscribes it.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StatusChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers().push(tx);
        rx
    }

    /// Sets the network flag. Returns true if it changed.
    pub fn set_network_down(&self, down: bool) -> bool {
        self.update(&self.network_down, down)
    }

    /// Sets the server flag. Returns true if it changed.
    pub fn set_server_down(&self, down: bool) -> bool {
        self.update(&self.server_down, down)
    }

    /// Applies the outcome of a health probe to the server flag.
    pub fn apply_probe(&self, result: &TransportResult<()>) -> bool {
        match result {
            Ok(()) => self.set_server_down(false),
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                self.set_server_down(true)
            }
        }
    }

    fn observers(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<StatusChange>>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, flag: &AtomicBool, down: bool) -> bool {
        let mut observers = self.observers();
        let previous = self.state();
        if flag.swap(down, Ordering::AcqRel) == down {
            return false;
        }
        let change = StatusChange {
            previous,
            current: self.state(),
        };

        tracing::info!(from = %change.previous.link(), to = %change.current.link(), "connectivity changed");
        observers.retain(|tx| tx.send(change).is_ok());
        true
    }
}
