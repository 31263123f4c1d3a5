// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::Path;

use crate::config::init_work_dir;
use crate::error::Result;

/// Written to `.shelf/.gitignore` so the local queue stays out of commits.
const GITIGNORE: &str = "store/\n";

pub fn run(api_url: String) -> Result<()> {
    let target_path = std::env::current_dir()?;
    run_impl(&target_path, &api_url)
}

/// Internal implementation that accepts the target path for testing.
pub(crate) fn run_impl(target_path: &Path, api_url: &str) -> Result<()> {
    let work_dir = init_work_dir(target_path, api_url)?;
    fs::write(work_dir.join(".gitignore"), GITIGNORE)?;

    println!("Initialized shelf at {}", work_dir.display());
    println!("API: {}", api_url);
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
