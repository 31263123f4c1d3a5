// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! shelf-core: Shared library for the shelf catalog client
//!
//! This crate provides the data structures and storage primitives used by
//! the shelf sync subsystem: product payloads, queued operations and their
//! durable record format, connectivity state, and the size-bounded
//! key/value store the operation log is written to.

pub mod connectivity;
pub mod error;
pub mod kv;
pub mod op;
pub mod product;

pub use connectivity::{ConnectivityState, Link};
pub use error::{Error, Result};
pub use kv::{FileStore, KvStore, MemoryStore, UpdateFn, DEFAULT_QUOTA_BYTES};
pub use op::{Action, OpType, Operation};
pub use product::{is_temporary, ProductId, ProductPayload};
