// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::error::Error;
use shelf_core::{Action, ProductPayload};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn sync(ctx: &TestContext) -> Result<PassOutcome> {
    run_impl(&ctx.log, &ctx.monitor, Arc::clone(&ctx.transport), TIMEOUT).await
}

#[tokio::test]
async fn test_sync_drains_queue() {
    let ctx = TestContext::new();
    ctx.enqueue(Action::create_local(ProductPayload::named("Ball"), -1));
    ctx.enqueue(Action::delete(-1));
    ctx.transport.push_ok(201, r#"{"id": 42}"#);

    let outcome = sync(&ctx).await.unwrap();

    assert_eq!(
        outcome,
        PassOutcome::Completed {
            applied: 2,
            created: vec![(-1, 42)],
        }
    );
    assert_eq!(summary(&outcome), "Synced 2 operations\n  -1 -> 42");
    assert_eq!(ctx.transport.calls()[1].path, "/products/42");
    assert!(ctx.reopen().is_empty());
}

#[tokio::test]
async fn test_sync_empty_queue() {
    let ctx = TestContext::new();

    let outcome = sync(&ctx).await.unwrap();

    assert_eq!(outcome, PassOutcome::Skipped(SkipReason::Empty));
    assert_eq!(summary(&outcome), "Nothing to sync");
    assert!(ctx.transport.calls().is_empty());
}

#[tokio::test]
async fn test_sync_fails_when_probe_fails() {
    let ctx = TestContext::new();
    ctx.enqueue(Action::delete(7));
    ctx.transport.set_probe_down(true);

    let err = sync(&ctx).await.unwrap_err();

    assert!(matches!(err, Error::Sync(SyncError::ServerUnavailable(_))));
    assert!(ctx.transport.calls().is_empty());
    assert_eq!(ctx.pending().len(), 1);
}

#[tokio::test]
async fn test_sync_fails_when_network_down() {
    let ctx = TestContext::new();
    ctx.enqueue(Action::delete(7));
    ctx.monitor.set_network_down(true);

    let err = sync(&ctx).await.unwrap_err();

    assert!(matches!(err, Error::Sync(SyncError::NetworkUnavailable(_))));
    assert!(ctx.transport.calls().is_empty());
}

#[tokio::test]
async fn test_sync_reports_rejection() {
    let ctx = TestContext::new();
    ctx.enqueue(Action::delete(7));
    ctx.enqueue(Action::delete(8));
    ctx.transport.push_ok(200, "{}").push_status(404);

    let err = sync(&ctx).await.unwrap_err();

    assert!(err.to_string().contains("404"), "{}", err);
    assert_eq!(ctx.pending()[0].action, Action::delete(8));
    assert!(ctx.monitor.is_server_down());
}

#[test]
fn test_summary_singular() {
    let outcome = PassOutcome::Completed {
        applied: 1,
        created: Vec::new(),
    };
    assert_eq!(summary(&outcome), "Synced 1 operation");
}
