// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::sync::{lock, NetworkWatcher, Reconciler, RunnerStats, SyncRunner, Transport};

use super::{block_on, open_context};

pub fn run() -> Result<()> {
    let ctx = open_context()?;
    let api_url = ctx.api_url()?;
    let config = ctx.config.sync_config();
    let transport = ctx.transport()?;
    let watcher = NetworkWatcher::for_url(&api_url, config.request_timeout)?;

    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&ctx.log),
        Arc::clone(&ctx.monitor),
        transport,
        config.request_timeout,
    ));
    let runner =
        SyncRunner::new(reconciler, Arc::clone(&ctx.monitor), config).with_network_watcher(watcher);

    let pending = lock(&ctx.log).len();
    println!(
        "Watching {} ({} pending), press Ctrl-C to stop",
        api_url, pending
    );

    let stats = block_on(async {
        run_impl(runner, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    })?;

    println!(
        "Stopped: {} applied, {} failed passes, {} pending",
        stats.applied,
        stats.failures,
        lock(&ctx.log).len()
    );
    Ok(())
}

/// Runs `runner` until `shutdown` completes.
pub(crate) async fn run_impl<T, S>(runner: SyncRunner<T>, shutdown: S) -> RunnerStats
where
    T: Transport + 'static,
    S: Future<Output = ()>,
{
    let cancel = runner.cancel_token();
    let handle = tokio::spawn(runner.run());
    tokio::pin!(handle);

    tokio::select! {
        stats = &mut handle => return stats.unwrap_or_default(),
        _ = shutdown => cancel.cancel(),
    }
    handle.await.unwrap_or_default()
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
