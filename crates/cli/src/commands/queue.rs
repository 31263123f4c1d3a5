// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::DateTime;
use shelf_core::Operation;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::QueueBridge;

use super::open_context;

pub fn run(output: OutputFormat) -> Result<()> {
    let ctx = open_context()?;
    run_impl(&ctx.bridge(), output)
}

/// Internal implementation that accepts the bridge for testing.
pub(crate) fn run_impl(bridge: &QueueBridge, output: OutputFormat) -> Result<()> {
    let ops = bridge.snapshot();
    println!("{}", render(&ops, output)?);
    Ok(())
}

pub(crate) fn render(ops: &[Operation], output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ops)?),
        OutputFormat::Text if ops.is_empty() => Ok("No pending operations".to_string()),
        OutputFormat::Text => {
            let lines: Vec<String> = ops
                .iter()
                .enumerate()
                .map(|(i, op)| format!("{:>3}. {}  {}", i + 1, format_timestamp(op.timestamp), op))
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

/// Formats epoch milliseconds as UTC, falling back to the raw number.
fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
