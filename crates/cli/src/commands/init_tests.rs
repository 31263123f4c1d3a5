// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::config::Config;
use crate::error::Error;
use tempfile::TempDir;

#[test]
fn test_init_writes_config_and_gitignore() {
    let temp = TempDir::new().unwrap();
    run_impl(temp.path(), "https://shop.example.com/api").unwrap();

    let work_dir = temp.path().join(".shelf");
    let config = Config::load(&work_dir).unwrap();
    assert_eq!(config.api_url, "https://shop.example.com/api");
    assert_eq!(
        std::fs::read_to_string(work_dir.join(".gitignore")).unwrap(),
        "store/\n"
    );
    assert!(work_dir.join("store").is_dir());
}

#[test]
fn test_init_twice_fails() {
    let temp = TempDir::new().unwrap();
    run_impl(temp.path(), "http://localhost:3001/api").unwrap();
    let err = run_impl(temp.path(), "http://localhost:3001/api").unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized(_)));
}

#[test]
fn test_init_rejects_invalid_url() {
    let temp = TempDir::new().unwrap();
    let err = run_impl(temp.path(), "not a url").unwrap_err();
    assert!(matches!(err, Error::InvalidApiUrl(_)));
}
