// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use serde::Serialize;
use shelf_core::{ConnectivityState, Link};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{ConnectivityMonitor, NetworkWatcher, QueueBridge, Transport};

use super::{block_on, open_context, probe_server};

/// What `status` reports.
#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub network_down: bool,
    pub server_down: bool,
    pub offline: bool,
    pub link: Link,
    pub pending: usize,
    pub banner: &'static str,
}

impl StatusReport {
    pub fn new(state: ConnectivityState, pending: usize) -> Self {
        StatusReport {
            network_down: state.network_down,
            server_down: state.server_down,
            offline: state.offline(),
            link: state.link(),
            pending,
            banner: state.banner(),
        }
    }

    pub fn render(&self, output: OutputFormat) -> Result<String> {
        match output {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(format!(
                "network: {}\nserver:  {}\noffline: {}\npending: {}\n\n{}",
                up_down(self.network_down),
                up_down(self.server_down),
                self.offline,
                self.pending,
                self.banner
            )),
        }
    }
}

fn up_down(down: bool) -> &'static str {
    if down {
        "down"
    } else {
        "up"
    }
}

pub fn run(output: OutputFormat) -> Result<()> {
    let ctx = open_context()?;
    let transport = ctx.transport()?;
    let watcher = NetworkWatcher::for_url(&ctx.api_url()?, ctx.request_timeout())?;
    let bridge = ctx.bridge();
    let report = block_on(run_impl(
        &bridge,
        &ctx.monitor,
        transport.as_ref(),
        Some(&watcher),
        ctx.request_timeout(),
    ))?;
    println!("{}", report.render(output)?);
    Ok(())
}

/// Checks the network, probes the server, and reports.
///
/// The server is only probed when the network check passed.
pub(crate) async fn run_impl<T: Transport + ?Sized>(
    bridge: &QueueBridge,
    monitor: &ConnectivityMonitor,
    transport: &T,
    watcher: Option<&NetworkWatcher>,
    timeout: Duration,
) -> StatusReport {
    if let Some(watcher) = watcher {
        monitor.set_network_down(!watcher.check().await);
    }
    if !monitor.is_network_down() {
        // The outcome lands in the monitor.
        let _ = probe_server(transport, monitor, timeout).await;
    }
    StatusReport::new(bridge.current_status(), bridge.pending_count())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
