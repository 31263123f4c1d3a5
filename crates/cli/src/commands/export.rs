// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::sync::QueueBridge;

use super::open_context;

pub fn run(filepath: &str) -> Result<()> {
    validate_export_path(filepath)?;

    let ctx = open_context()?;
    let count = run_impl(&ctx.bridge(), Path::new(filepath))?;
    println!("Exported {} operations to {}", count, filepath);
    Ok(())
}

fn validate_export_path(filepath: &str) -> Result<()> {
    if filepath.trim().is_empty() {
        return Err(Error::ExportPathEmpty);
    }
    Ok(())
}

/// Writes the pending operations as a pretty JSON array of stored records.
pub(crate) fn run_impl(bridge: &QueueBridge, filepath: &Path) -> Result<usize> {
    let ops = bridge.snapshot();
    let file = File::create(filepath)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ops)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(ops.len())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
