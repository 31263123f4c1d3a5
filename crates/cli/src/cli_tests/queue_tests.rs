// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use clap::Parser;
use yare::parameterized;

#[parameterized(
    default = { &["shelf", "queue"], OutputFormat::Text },
    short = { &["shelf", "queue", "-o", "json"], OutputFormat::Json },
    long = { &["shelf", "queue", "--output", "text"], OutputFormat::Text },
)]
fn queue_output(args: &[&str], expected: OutputFormat) {
    match Cli::try_parse_from(args).unwrap().command {
        Command::Queue { output } => assert_eq!(output, expected),
        _ => panic!("expected Queue command"),
    }
}

#[test]
fn status_json() {
    match Cli::try_parse_from(["shelf", "status", "-o", "json"]).unwrap().command {
        Command::Status { output } => assert_eq!(output, OutputFormat::Json),
        _ => panic!("expected Status command"),
    }
}

#[test]
fn unknown_output_format_rejected() {
    assert!(Cli::try_parse_from(["shelf", "queue", "-o", "yaml"]).is_err());
}

#[test]
fn export_requires_path() {
    assert!(Cli::try_parse_from(["shelf", "export"]).is_err());
    match Cli::try_parse_from(["shelf", "export", "out.json"]).unwrap().command {
        Command::Export { filepath } => assert_eq!(filepath, "out.json"),
        _ => panic!("expected Export command"),
    }
}

#[parameterized(
    bare = { &["shelf", "clear"], false },
    short = { &["shelf", "clear", "-y"], true },
    long = { &["shelf", "clear", "--yes"], true },
)]
fn clear_confirmation(args: &[&str], expected: bool) {
    match Cli::try_parse_from(args).unwrap().command {
        Command::Clear { yes } => assert_eq!(yes, expected),
        _ => panic!("expected Clear command"),
    }
}

#[test]
fn parameterless_commands() {
    assert!(matches!(
        Cli::try_parse_from(["shelf", "prune"]).unwrap().command,
        Command::Prune
    ));
    assert!(matches!(
        Cli::try_parse_from(["shelf", "watch"]).unwrap().command,
        Command::Watch
    ));
}
