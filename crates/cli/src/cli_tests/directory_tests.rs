// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use clap::Parser;

#[test]
fn parse_dash_c_before_subcommand() {
    let cli = Cli::try_parse_from(["shelf", "-C", "/tmp", "queue"]).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn parse_dash_c_with_equals() {
    let cli = Cli::try_parse_from(["shelf", "-C=/tmp", "queue"]).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn parse_long_directory_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["shelf", "status", "--directory", "/tmp"]).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn parse_without_directory() {
    let cli = Cli::try_parse_from(["shelf", "sync"]).unwrap();
    assert!(cli.directory.is_none());
    assert!(matches!(cli.command, Command::Sync));
}

#[test]
fn version_flag_short_circuits() {
    let err = Cli::try_parse_from(["shelf", "-v"]).err().unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}

#[test]
fn init_defaults_api_url() {
    let cli = Cli::try_parse_from(["shelf", "init"]).unwrap();
    match cli.command {
        Command::Init { api_url } => assert_eq!(api_url, "http://localhost:3001/api"),
        _ => panic!("expected Init command"),
    }
}

#[test]
fn init_with_api_url() {
    let cli = Cli::try_parse_from(["shelf", "init", "--api-url", "https://shop.example.com/api"])
        .unwrap();
    match cli.command {
        Command::Init { api_url } => assert_eq!(api_url, "https://shop.example.com/api"),
        _ => panic!("expected Init command"),
    }
}
