// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{Error, Result};
use crate::sync::QueueBridge;

use super::open_context;

pub fn run(yes: bool) -> Result<()> {
    let ctx = open_context()?;
    let dropped = run_impl(&ctx.bridge(), yes)?;
    if dropped == 0 {
        println!("Nothing to clear");
    } else {
        println!("Dropped {} pending operations", dropped);
    }
    Ok(())
}

/// Drops every pending operation; refuses without `yes` when any are pending.
pub(crate) fn run_impl(bridge: &QueueBridge, yes: bool) -> Result<usize> {
    let pending = bridge.pending_count();
    if pending == 0 {
        return Ok(0);
    }
    if !yes {
        eprintln!(
            "{} pending operations would be lost; rerun with --yes to drop them",
            pending
        );
        return Err(Error::Cancelled);
    }
    Ok(bridge.clear()?)
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
