// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Product mutations: `create`, `update` and `delete`.
//!
//! A mutation is sent straight to the server when it is reachable and nothing
//! is waiting in the queue. Otherwise, or when the call fails, the intent is
//! queued and replayed later by `sync` or `watch`.

use std::time::Duration;

use shelf_core::{is_temporary, Action, Operation, ProductId};

use crate::cli::PayloadArgs;
use crate::error::{Error, Result};
use crate::sync::{ConnectivityMonitor, QueueBridge, RemoteCall, Transport, TransportError};

use super::{block_on, open_context, probe_server};

/// What happened to a submitted intent.
#[derive(Debug)]
pub enum Submitted {
    /// The server accepted the call.
    Sent {
        op: Operation,
        created: Option<ProductId>,
    },
    /// The intent was queued for a later pass.
    Queued { op: Operation, pending: usize },
}

impl Submitted {
    /// One-line report for the terminal.
    pub fn summary(&self) -> String {
        match self {
            Submitted::Sent { op, created } => match (&op.action, created) {
                (Action::Create { payload, .. }, Some(id)) => {
                    format!("Created product {} \"{}\"", id, payload.name)
                }
                (Action::Create { payload, .. }, None) => {
                    format!("Created product \"{}\"", payload.name)
                }
                (Action::Update { id, .. }, _) => format!("Updated product {}", id),
                (Action::Delete { id }, _) => format!("Deleted product {}", id),
            },
            Submitted::Queued { op, pending } => {
                format!("queued: {} ({} pending)", op, pending)
            }
        }
    }
}

pub fn create(
    name: String,
    payload: PayloadArgs,
    local_id: Option<ProductId>,
    queue: bool,
) -> Result<()> {
    let payload = payload.into_payload(name);
    let action = match local_id {
        Some(id) => Action::create_local(payload, id),
        None => Action::create(payload),
    };
    submit(action, queue)
}

pub fn update(id: ProductId, name: Option<String>, payload: PayloadArgs, queue: bool) -> Result<()> {
    submit(update_action(id, name, payload)?, queue)
}

pub fn delete(id: ProductId, queue: bool) -> Result<()> {
    submit(Action::delete(id), queue)
}

/// Builds an Update, refusing one that would change nothing.
pub(crate) fn update_action(
    id: ProductId,
    name: Option<String>,
    payload: PayloadArgs,
) -> Result<Action> {
    let payload = payload.into_payload(name.unwrap_or_default()).sanitize();
    if payload.is_empty() {
        return Err(Error::NothingToUpdate);
    }
    Ok(Action::update(id, payload))
}

fn submit(action: Action, queue_only: bool) -> Result<()> {
    let ctx = open_context()?;
    let transport = ctx.transport()?;
    let bridge = ctx.bridge();
    let submitted = block_on(submit_impl(
        &bridge,
        &ctx.monitor,
        transport.as_ref(),
        ctx.request_timeout(),
        action,
        queue_only,
    ))??;
    println!("{}", submitted.summary());
    Ok(())
}

/// Internal implementation that accepts the queue and transport for testing.
pub(crate) async fn submit_impl<T: Transport + ?Sized>(
    bridge: &QueueBridge,
    monitor: &ConnectivityMonitor,
    transport: &T,
    timeout: Duration,
    action: Action,
    queue_only: bool,
) -> Result<Submitted> {
    let action = action.sanitize();
    let op = Operation::new(chrono::Utc::now().timestamp_millis(), action.clone());
    if !op.is_valid() {
        return Err(Error::FieldEmpty { field: "name" });
    }

    if !queue_only && can_send_now(bridge, &action) {
        match send(monitor, transport, timeout, &op).await {
            Ok(created) => return Ok(Submitted::Sent { op, created }),
            Err(e) => tracing::warn!(error = %e, op = %op, "direct call failed, queueing"),
        }
    }

    let op = bridge.enqueue(action)?;
    Ok(Submitted::Queued {
        op,
        pending: bridge.pending_count(),
    })
}

/// Sending directly must not overtake queued intents, and temporary ids
/// only resolve during a pass.
fn can_send_now(bridge: &QueueBridge, action: &Action) -> bool {
    let temporary = match action {
        Action::Update { id, .. } | Action::Delete { id } => is_temporary(*id),
        Action::Create { .. } => false,
    };
    !temporary && bridge.pending_count() == 0
}

async fn send<T: Transport + ?Sized>(
    monitor: &ConnectivityMonitor,
    transport: &T,
    timeout: Duration,
    op: &Operation,
) -> std::result::Result<Option<ProductId>, TransportError> {
    probe_server(transport, monitor, timeout).await?;

    let call = RemoteCall::for_operation(op);
    tracing::debug!(call = %call, "sending directly");
    let result = tokio::time::timeout(timeout, transport.execute(call))
        .await
        .unwrap_or(Err(TransportError::Timeout));
    match result {
        Ok(reply) => Ok(reply.created_id()),
        Err(e) => {
            monitor.set_server_down(true);
            if e.is_unreachable() {
                monitor.set_network_down(true);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "mutate_tests.rs"]
mod tests;
