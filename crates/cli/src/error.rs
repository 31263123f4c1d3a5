// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{QueueError, SyncError, TransportError};

/// All possible errors that can occur in the shelfrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'shelf init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid api url: '{0}'\n  hint: use an http:// or https:// url, e.g. http://localhost:3001/api")]
    InvalidApiUrl(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("nothing to update\n  hint: pass at least one of --name, --price, --stock, --description, --category or --image")]
    NothingToUpdate,

    #[error("export path cannot be empty")]
    ExportPathEmpty,

    #[error("operation cancelled")]
    Cancelled,

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Queue(#[from] QueueError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("storage error: {0}")]
    Store(#[from] shelf_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
