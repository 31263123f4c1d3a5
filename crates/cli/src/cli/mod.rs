// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::PayloadArgs;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "shelf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Offline-capable product catalog client")]
#[command(
    long_about = "Offline-capable product catalog client.\n\n\
    Product changes made while the network or the catalog API is unreachable are queued \
    locally and replayed in order once both are back."
)]
// Allow the unit type field pattern which is required for clap's ArgAction::Version/Help
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Run as if shelf was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize shelf in the current directory
    Init {
        /// Base URL of the catalog API
        #[arg(long, default_value = crate::config::DEFAULT_API_URL)]
        api_url: String,
    },

    /// Create a product
    #[command(after_help = "\
Examples:
  shelf create --name Ball --price 10       Create now, or queue if offline
  shelf create --name Ball --local-id -1    Later operations may refer to -1
  shelf create --name Ball --queue          Always queue")]
    Create {
        /// Product name
        #[arg(long, value_parser = non_empty_string)]
        name: String,

        #[command(flatten)]
        payload: PayloadArgs,

        /// Temporary id for later operations to refer to this product
        #[arg(long, allow_negative_numbers = true)]
        local_id: Option<i64>,

        /// Queue the change without trying the server
        #[arg(long)]
        queue: bool,
    },

    /// Update fields of a product
    Update {
        /// Product id (negative for a temporary id)
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// New product name
        #[arg(long, value_parser = non_empty_string)]
        name: Option<String>,

        #[command(flatten)]
        payload: PayloadArgs,

        /// Queue the change without trying the server
        #[arg(long)]
        queue: bool,
    },

    /// Delete a product
    Delete {
        /// Product id (negative for a temporary id)
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Queue the change without trying the server
        #[arg(long)]
        queue: bool,
    },

    /// Show pending operations in order
    Queue {
        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Probe the server and show connectivity
    Status {
        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay pending operations now
    Sync,

    /// Remove operations that can never be sent
    Prune,

    /// Write pending operations to a JSON file
    #[command(arg_required_else_help = true)]
    Export {
        /// Output file path
        filepath: String,
    },

    /// Drop every pending operation
    Clear {
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Keep syncing in the foreground until interrupted
    Watch,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
