// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use shelf_core::{Action, MemoryStore, ProductPayload};

use super::monitor::ConnectivityMonitor;
use super::queue::{OperationLog, SharedLog};

pub const TEST_KEY: &str = "offline_operations";

/// Open a log over the given store under the test key.
pub fn open_log(store: &MemoryStore) -> OperationLog {
    OperationLog::open(Box::new(store.clone()), TEST_KEY).unwrap()
}

/// Open a shared log over a fresh in-memory store.
pub fn shared_log() -> (MemoryStore, SharedLog) {
    let store = MemoryStore::new();
    let log = open_log(&store).shared();
    (store, log)
}

/// A monitor that starts with both flags up.
pub fn online_monitor() -> Arc<ConnectivityMonitor> {
    Arc::new(ConnectivityMonitor::new(false))
}

/// Create intent for a named product.
pub fn create(name: &str) -> Action {
    Action::create(ProductPayload::named(name).with_price(10.0))
}

/// Update intent renaming a product.
pub fn update(id: i64, name: &str) -> Action {
    Action::update(id, ProductPayload::named(name))
}

/// Delete intent.
pub fn delete(id: i64) -> Action {
    Action::delete(id)
}
