// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use shelf_core::{Action, ProductPayload};

#[test]
fn test_prune_removes_blank_creates() {
    let ctx = TestContext::new();
    ctx.enqueue(Action::create(ProductPayload::named("Ball")));
    ctx.enqueue(Action::create(ProductPayload::named("")));
    ctx.enqueue(Action::update(7, ProductPayload::default().with_stock(1)));

    assert_eq!(run_impl(&ctx.bridge()).unwrap(), 1);

    let remaining = ctx.reopen();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|op| op.is_valid()));
}

#[test]
fn test_prune_nothing_invalid() {
    let ctx = TestContext::new();
    ctx.enqueue(Action::delete(7));

    assert_eq!(run_impl(&ctx.bridge()).unwrap(), 0);
    assert_eq!(ctx.pending().len(), 1);
}
