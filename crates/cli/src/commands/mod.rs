// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod export;
pub mod init;
pub mod mutate;
pub mod prune;
pub mod queue;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shelf_core::FileStore;

use crate::config::{find_work_dir, get_store_dir, Config};
use crate::error::Result;
use crate::sync::{
    ConnectivityMonitor, HttpTransport, OperationLog, QueueBridge, SharedLog, Transport,
    TransportError, TransportResult,
};

/// Everything a command needs from the current project.
pub struct Context {
    pub config: Config,
    pub log: SharedLog,
    pub monitor: Arc<ConnectivityMonitor>,
}

impl Context {
    /// Bridge over this context's queue and monitor.
    pub fn bridge(&self) -> QueueBridge {
        QueueBridge::new(Arc::clone(&self.log), Arc::clone(&self.monitor))
    }

    /// The API url after overrides.
    pub fn api_url(&self) -> Result<String> {
        self.config.resolved_api_url()
    }

    pub fn request_timeout(&self) -> Duration {
        self.config.sync_config().request_timeout
    }

    /// HTTP transport for the configured API.
    pub fn transport(&self) -> Result<Arc<HttpTransport>> {
        let transport = HttpTransport::new(self.api_url()?, self.request_timeout())?;
        Ok(Arc::new(transport))
    }
}

/// Helper to open the queue from the current context.
pub fn open_context() -> Result<Context> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let store = FileStore::open(get_store_dir(&work_dir, &config), config.storage.quota_bytes)?;
    let log = OperationLog::open(Box::new(store), &config.storage.key)?.shared();
    Ok(Context {
        config,
        log,
        // A one-shot command learns the real state by probing.
        monitor: Arc::new(ConnectivityMonitor::new(false)),
    })
}

/// Runs a future to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(future))
}

/// Probes the server once, bounded by `timeout`, and records the result.
pub(crate) async fn probe_server<T: Transport + ?Sized>(
    transport: &T,
    monitor: &ConnectivityMonitor,
    timeout: Duration,
) -> TransportResult<()> {
    let result = tokio::time::timeout(timeout, transport.probe())
        .await
        .unwrap_or(Err(TransportError::Timeout));
    monitor.apply_probe(&result);
    result
}
