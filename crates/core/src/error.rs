// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for shelf-core operations.

use thiserror::Error;

/// All possible errors that can occur in shelf-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage quota exceeded: write needs {needed} bytes, quota is {quota}\n  hint: sync or prune pending operations to free space")]
    QuotaExceeded { needed: u64, quota: u64 },

    #[error("invalid storage key: '{0}'\n  hint: keys are non-empty and use only letters, digits, '-' and '_'")]
    InvalidKey(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// A specialized Result type for shelf-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
