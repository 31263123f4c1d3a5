// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::sync::{
    ConnectivityMonitor, PassOutcome, Reconciler, SharedLog, SkipReason, SyncError, Transport,
};

use super::{block_on, open_context, probe_server};

pub fn run() -> Result<()> {
    let ctx = open_context()?;
    let transport = ctx.transport()?;
    let outcome = block_on(run_impl(
        &ctx.log,
        &ctx.monitor,
        transport,
        ctx.request_timeout(),
    ))??;
    println!("{}", summary(&outcome));
    Ok(())
}

/// Probes the server, then runs one reconciliation pass.
///
/// A failed probe or pass is an error so the process exits non-zero.
pub(crate) async fn run_impl<T: Transport>(
    log: &SharedLog,
    monitor: &Arc<ConnectivityMonitor>,
    transport: Arc<T>,
    timeout: Duration,
) -> Result<PassOutcome> {
    if let Err(e) = probe_server(transport.as_ref(), monitor, timeout).await {
        return Err(SyncError::ServerUnavailable(e.to_string()).into());
    }

    let reconciler = Reconciler::new(Arc::clone(log), Arc::clone(monitor), transport, timeout);
    match reconciler.run().await? {
        PassOutcome::Skipped(SkipReason::Offline) => Err(SyncError::NetworkUnavailable(
            monitor.state().link().to_string(),
        )
        .into()),
        outcome => Ok(outcome),
    }
}

pub(crate) fn summary(outcome: &PassOutcome) -> String {
    match outcome {
        PassOutcome::Skipped(SkipReason::Empty) => "Nothing to sync".to_string(),
        PassOutcome::Skipped(reason) => format!("Sync skipped ({:?})", reason),
        PassOutcome::Completed { applied, created } => {
            let mut out = format!("Synced {} operation{}", applied, plural(*applied));
            for (local, real) in created {
                out.push_str(&format!("\n  {} -> {}", local, real));
            }
            out
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
