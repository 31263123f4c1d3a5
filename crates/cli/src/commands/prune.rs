// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;
use crate::sync::QueueBridge;

use super::open_context;

pub fn run() -> Result<()> {
    let ctx = open_context()?;
    let removed = run_impl(&ctx.bridge())?;
    match removed {
        0 => println!("No invalid operations"),
        1 => println!("Removed 1 invalid operation"),
        n => println!("Removed {} invalid operations", n),
    }
    Ok(())
}

/// Internal implementation that accepts the bridge for testing.
pub(crate) fn run_impl(bridge: &QueueBridge) -> Result<usize> {
    Ok(bridge.prune_invalid()?)
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;
