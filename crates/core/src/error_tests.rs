// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_key = { Error::InvalidKey("bad/key".into()), "bad/key" },
    invalid_record = { Error::InvalidRecord("UPDATE without id".into()), "UPDATE without id" },
    quota = { Error::QuotaExceeded { needed: 120, quota: 100 }, "120 bytes" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn quota_error_has_hint() {
    let err = Error::QuotaExceeded {
        needed: 10,
        quota: 5,
    };
    assert!(err.to_string().contains("hint:"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
