// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable operation log for intents recorded while offline.
//!
//! The whole queue is stored as one JSON array under a single key of a
//! [`KvStore`]. Every mutation re-reads the stored queue, applies its change
//! and writes the complete result in one [`KvStore::update`], so several
//! logs over the same storage (other processes included) never overwrite
//! each other's intents. The in-memory queue only changes once the write
//! succeeded.
//!
//! Loading is forgiving: a value that is not a JSON array is treated as an
//! empty queue (the bad value is set aside under `<key>_corrupt`), and records
//! that fail validation are dropped. Losing unsent intents is preferred over
//! refusing to start.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use shelf_core::{Action, KvStore, Operation, ProductId};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] shelf_core::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Queue shared between the bridge, the reconciler and the runner.
pub type SharedLog = Arc<Mutex<OperationLog>>;

/// Locks a shared log.
///
/// The queue only changes after a successful write, so a guard poisoned by a
/// panicking holder still protects a consistent queue.
pub fn lock(log: &SharedLog) -> MutexGuard<'_, OperationLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered, persistent list of pending operations.
pub struct OperationLog {
    store: Box<dyn KvStore>,
    key: String,
    ops: Vec<Operation>,
}

/// Result of decoding a stored queue value.
struct Decoded {
    ops: Vec<Operation>,
    /// Records that failed validation and were skipped.
    dropped: usize,
    /// The value was not a JSON array at all.
    corrupt: bool,
}

fn decode(key: &str, raw: Option<&str>) -> Decoded {
    let Some(raw) = raw else {
        return Decoded {
            ops: Vec::new(),
            dropped: 0,
            corrupt: false,
        };
    };

    let records = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored queue is corrupt, starting empty");
            return Decoded {
                ops: Vec::new(),
                dropped: 0,
                corrupt: true,
            };
        }
    };

    let total = records.len();
    let mut ops = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Operation>(record) {
            Ok(op) => ops.push(op),
            Err(e) => {
                tracing::warn!(index, error = %e, "dropping unreadable queued operation");
            }
        }
    }
    let dropped = total - ops.len();
    Decoded {
        ops,
        dropped,
        corrupt: false,
    }
}

impl OperationLog {
    /// Opens the log stored under `key`, loading any pending operations.
    pub fn open(store: Box<dyn KvStore>, key: &str) -> QueueResult<Self> {
        let mut log = OperationLog {
            store,
            key: key.to_string(),
            ops: Vec::new(),
        };
        log.reload()?;
        Ok(log)
    }

    /// Wraps the log for sharing.
    pub fn shared(self) -> SharedLog {
        Arc::new(Mutex::new(self))
    }

    /// Re-reads the queue from storage, replacing the in-memory view.
    pub fn reload(&mut self) -> QueueResult<()> {
        let raw = self.store.get(&self.key)?;
        let decoded = decode(&self.key, raw.as_deref());

        if decoded.corrupt {
            if let Some(raw) = raw {
                self.set_aside_corrupt(raw);
            }
            self.ops.clear();
            return Ok(());
        }

        self.ops = decoded.ops;
        if decoded.dropped > 0 {
            // Write back the readable part so storage matches memory again.
            if let Err(e) = self.modify(|_| false) {
                tracing::warn!(error = %e, "could not rewrite the queue after dropping records");
            }
        }

        tracing::debug!(pending = self.ops.len(), dropped = decoded.dropped, "loaded operation queue");
        Ok(())
    }

    /// Keeps a copy of an unreadable value, then removes it unless another
    /// writer replaced it meanwhile.
    fn set_aside_corrupt(&mut self, raw: String) {
        let backup = format!("{}_corrupt", self.key);
        if let Err(e) = self.store.set(&backup, &raw) {
            tracing::warn!(error = %e, "could not keep a copy of the corrupt queue");
        }
        let mut unless_replaced = |current: Option<&str>| -> shelf_core::Result<Option<String>> {
            Ok(current.filter(|v| *v != raw).map(str::to_string))
        };
        let removed = self.store.update(&self.key, &mut unless_replaced);
        if let Err(e) = removed {
            tracing::warn!(error = %e, "could not remove the corrupt queue");
        }
    }

    /// Applies `apply` to the queue as currently stored and writes the result.
    ///
    /// The stored queue is re-read under the store's writer lock, so changes
    /// made by other writers since this log last looked are kept. `apply`
    /// returns whether it changed anything. The in-memory view adopts the
    /// written queue only once the write succeeded.
    fn modify(&mut self, mut apply: impl FnMut(&mut Vec<Operation>) -> bool) -> QueueResult<()> {
        let key = self.key.clone();
        let mut written = None;
        let mut corrupt = None;

        let mut rewrite = |current: Option<&str>| -> shelf_core::Result<Option<String>> {
            let decoded = decode(&key, current);
            if decoded.corrupt {
                corrupt = current.map(str::to_string);
            }
            let mut ops = decoded.ops;
            let changed = apply(&mut ops) || decoded.dropped > 0 || decoded.corrupt;

            let next = if !changed {
                current.map(str::to_string)
            } else if ops.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&ops)?)
            };
            written = Some(ops);
            Ok(next)
        };
        self.store.update(&self.key, &mut rewrite)?;

        if let Some(raw) = corrupt {
            let backup = format!("{}_corrupt", self.key);
            if let Err(e) = self.store.set(&backup, &raw) {
                tracing::warn!(error = %e, "could not keep a copy of the corrupt queue");
            }
        }
        if let Some(ops) = written {
            self.ops = ops;
        }
        Ok(())
    }

    /// Appends an intent, stamping it with a non-decreasing timestamp.
    ///
    /// The intent's payload is sanitized before it is stored.
    pub fn append(&mut self, action: Action) -> QueueResult<Operation> {
        let mut op = Operation::new(chrono::Utc::now().timestamp_millis(), action.sanitize());
        self.modify(|ops| {
            if let Some(last) = ops.last() {
                op.timestamp = op.timestamp.max(last.timestamp);
            }
            ops.push(op.clone());
            true
        })?;

        tracing::debug!(op = %op, pending = self.ops.len(), "queued operation");
        Ok(op)
    }

    /// All pending operations in enqueue order.
    pub fn read_all(&self) -> &[Operation] {
        &self.ops
    }

    /// Owned copy of the pending operations.
    pub fn snapshot(&self) -> Vec<Operation> {
        self.ops.clone()
    }

    /// Replaces the whole queue.
    pub fn replace_all(&mut self, ops: Vec<Operation>) -> QueueResult<()> {
        self.modify(|current| {
            *current = ops.clone();
            true
        })
    }

    /// Removes every pending operation, returning how many were removed.
    pub fn clear(&mut self) -> QueueResult<usize> {
        let mut removed = 0;
        self.modify(|ops| {
            removed = ops.len();
            ops.clear();
            removed > 0
        })?;
        Ok(removed)
    }

    /// Removes operations the server acknowledged, and resolves temporary
    /// ids in the operations that remain.
    ///
    /// `sent` is the acknowledged prefix of a pass's snapshot. Each sent
    /// operation is removed only while it is still at the head of the stored
    /// queue, so operations appended meanwhile (by any writer) are kept, and
    /// entries already removed by a concurrent clear or prune are skipped.
    pub fn acknowledge(
        &mut self,
        sent: &[Operation],
        resolved: &HashMap<ProductId, ProductId>,
    ) -> QueueResult<()> {
        if sent.is_empty() && resolved.is_empty() {
            return Ok(());
        }

        let mut acknowledged = 0;
        let mut rewritten = 0;
        self.modify(|ops| {
            acknowledged = 0;
            rewritten = 0;
            for op in sent {
                if ops.get(acknowledged) == Some(op) {
                    acknowledged += 1;
                }
            }
            ops.drain(..acknowledged);
            for op in ops.iter_mut() {
                if op.remap(resolved) {
                    rewritten += 1;
                }
            }
            acknowledged > 0 || rewritten > 0
        })?;

        if acknowledged < sent.len() {
            tracing::debug!(
                missing = sent.len() - acknowledged,
                "acknowledged operations were already removed"
            );
        }
        tracing::debug!(
            acknowledged,
            rewritten,
            pending = self.ops.len(),
            "acknowledged operations"
        );
        Ok(())
    }

    /// Drops operations that can never be sent (a Create without a name).
    ///
    /// Returns the number of operations removed.
    pub fn prune_invalid(&mut self) -> QueueResult<usize> {
        let mut removed = 0;
        self.modify(|ops| {
            let before = ops.len();
            ops.retain(|op| op.is_valid());
            removed = before - ops.len();
            removed > 0
        })?;
        if removed > 0 {
            tracing::info!(removed, "pruned invalid operations");
        }
        Ok(removed)
    }

    /// Returns the stored value exactly as persisted.
    pub fn raw(&self) -> QueueResult<Option<String>> {
        Ok(self.store.get(&self.key)?)
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.ops.last().map(|op| op.timestamp)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
