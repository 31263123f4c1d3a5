// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity flags.
//!
//! Network reachability and server reachability are tracked independently.
//! The client is offline when either one is down.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Snapshot of both connectivity flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityState {
    pub network_down: bool,
    pub server_down: bool,
}

impl ConnectivityState {
    /// Initial state: network as reported by the platform, server assumed up.
    pub fn initial(network_down: bool) -> Self {
        ConnectivityState {
            network_down,
            server_down: false,
        }
    }

    pub fn offline(&self) -> bool {
        self.network_down || self.server_down
    }

    pub fn link(&self) -> Link {
        match (self.network_down, self.server_down) {
            (false, false) => Link::Up,
            (true, false) => Link::NetworkDown,
            (false, true) => Link::ServerDown,
            (true, true) => Link::Both,
        }
    }

    /// One-line summary for status displays.
    pub fn banner(&self) -> &'static str {
        if self.offline() {
            "Working offline - changes will sync when connection is restored"
        } else {
            "All systems operational"
        }
    }
}

/// The four reachable connectivity states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    Up,
    NetworkDown,
    ServerDown,
    Both,
}

impl Link {
    pub fn as_str(&self) -> &'static str {
        match self {
            Link::Up => "up",
            Link::NetworkDown => "network_down",
            Link::ServerDown => "server_down",
            Link::Both => "both_down",
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
