// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! shelfrs - offline operation queue and sync for a product catalog client.
//!
//! This crate provides the functionality behind the `shelf` CLI: product
//! mutations that keep working while the network or the catalog API is down,
//! a durable queue of the intents recorded meanwhile, and the sync machinery
//! that replays them in order.
//!
//! # Main Components
//!
//! - [`sync`] - Operation log, connectivity monitor, reconciler and runner
//! - [`Config`] - Project configuration (API url, sync timing, storage)
//! - [`Error`] - Error types for all operations
//!
//! # Initialization
//!
//! Use [`init_work_dir`] to create a new `.shelf/` directory, then open the
//! queue:
//!
//! ```rust,ignore
//! use shelfrs::{find_work_dir, get_store_dir, init_work_dir, Config};
//! use shelfrs::sync::OperationLog;
//!
//! let work_dir = init_work_dir(Path::new("."), "http://localhost:3001/api")?;
//!
//! let config = Config::load(&work_dir)?;
//! let store = FileStore::open(get_store_dir(&work_dir, &config), config.storage.quota_bytes)?;
//! let log = OperationLog::open(Box::new(store), &config.storage.key)?;
//! ```

mod cli;
mod commands;
pub mod env;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat, PayloadArgs};
pub use config::{find_work_dir, get_store_dir, init_work_dir, Config};
pub use error::{Error, Result};

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `SHELF_LOG` wins over `RUST_LOG`; without either, `default_level` applies.
pub fn setup_logging(default_level: &str) {
    let filter = env::log_filter()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    // Ignore a subscriber installed earlier (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log level used when no filter is configured.
pub fn default_log_level(command: &Command) -> &'static str {
    match command {
        Command::Watch => "info",
        _ => "warn",
    }
}

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { api_url } => commands::init::run(api_url),
        Command::Create {
            name,
            payload,
            local_id,
            queue,
        } => commands::mutate::create(name, payload, local_id, queue),
        Command::Update {
            id,
            name,
            payload,
            queue,
        } => commands::mutate::update(id, name, payload, queue),
        Command::Delete { id, queue } => commands::mutate::delete(id, queue),
        Command::Queue { output } => commands::queue::run(output),
        Command::Status { output } => commands::status::run(output),
        Command::Sync => commands::sync::run(),
        Command::Prune => commands::prune::run(),
        Command::Export { filepath } => commands::export::run(&filepath),
        Command::Clear { yes } => commands::clear::run(yes),
        Command::Watch => commands::watch::run(),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
