// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability watcher.
//!
//! Stands in for the platform's online/offline events: it periodically
//! resolves the API host and opens a TCP connection to it. A refused
//! connection still proves the network path works, so only resolution
//! failures, unreachable routes and timeouts count as offline.

use std::io::ErrorKind;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::transport::{TransportError, TransportResult};

#[derive(Debug, Clone)]
pub struct NetworkWatcher {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkWatcher {
    /// Create a watcher for the host of `api_url`.
    pub fn for_url(api_url: &str, timeout: Duration) -> TransportResult<Self> {
        let url = reqwest::Url::parse(api_url)
            .map_err(|e| TransportError::Protocol(format!("invalid api url '{}': {}", api_url, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| TransportError::Protocol(format!("api url '{}' has no host", api_url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| TransportError::Protocol(format!("api url '{}' has no port", api_url)))?;

        Ok(NetworkWatcher {
            host: host.trim_start_matches('[').trim_end_matches(']').to_string(),
            port,
            timeout,
        })
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if the network path to the API host works.
    pub async fn check(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => true,
            Ok(Err(e)) => {
                tracing::debug!(target = %self.target(), error = %e, "network check failed");
                false
            }
            Err(_) => {
                tracing::debug!(target = %self.target(), "network check timed out");
                false
            }
        }
    }

    /// Checks every `interval`, sending each result until cancelled or the
    /// receiver is dropped.
    pub fn spawn(
        self,
        interval: Duration,
        events: mpsc::Sender<bool>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = ticker.tick() => {
                        let online = tokio::select! {
                            _ = cancel.cancelled() => return,
                            online = self.check() => online,
                        };
                        if events.send(online).await.is_err() {
                            return;
                        }
                    }
                }
            }
        })
    }
}
