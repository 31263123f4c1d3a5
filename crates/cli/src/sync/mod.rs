// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline operation queue and sync with the catalog API.
//!
//! Lets the client keep working when the network or the API is unreachable:
//! intents are recorded durably and replayed, in order, once both are back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  UI / CLI   │────►│ QueueBridge │────►│OperationLog │  (durable queue)
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   ▲
//!                            ▼                   │ snapshot / acknowledge
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SyncRunner  │────►│Connectivity │────►│ Reconciler  │────►│  Transport  │
//! │ (probe/net) │     │  Monitor    │     │             │◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Features
//!
//! - Durable queue stored as one JSON array under a single store key
//! - Two independent reachability flags (network, server)
//! - In-order replay that stops at the first failure
//! - Temporary ids resolved once the server assigns real ones
//! - Periodic health probe with backoff after failed passes
//! - Injectable transport trait for testing

mod bridge;
mod monitor;
mod network;
mod queue;
mod reconciler;
mod runner;
mod transport;

pub use bridge::QueueBridge;
pub use monitor::{ConnectivityMonitor, StatusChange};
pub use network::NetworkWatcher;
pub use queue::{lock, OperationLog, QueueError, QueueResult, SharedLog};
pub use reconciler::{PassOutcome, Reconciler, SkipReason, SyncConfig, SyncError, SyncResult};
pub use runner::{RunnerStats, SyncRunner};
pub use transport::{
    HttpTransport, Method, RemoteCall, RemoteReply, Transport, TransportError, TransportResult,
};

#[cfg(test)]
pub(crate) mod test_helpers;






#[cfg(test)]
mod runner_tests;
