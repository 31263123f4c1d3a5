// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `SHELF_API_URL` if set and not blank.
pub fn api_url() -> Option<String> {
    std::env::var(vars::SHELF_API_URL)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the log filter from `SHELF_LOG` if set.
pub fn log_filter() -> Option<String> {
    std::env::var(vars::SHELF_LOG).ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
