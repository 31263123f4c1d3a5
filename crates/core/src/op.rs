// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued mutation intents.
//!
//! An [`Operation`] records one mutation the user asked for that has not been
//! acknowledged by the remote service yet. Operations are stored as records
//! of the form `{"type": "CREATE", "data": {...}, "timestamp": ...}` where
//! `data` holds the sanitized payload plus the product `id`.
//!
//! Deserializing a record re-sanitizes its payload, so loading the same
//! stored queue any number of times yields the same operations.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::product::{lenient_i64, ProductId, ProductPayload};

/// Wire tag of an operation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpType {
    Create,
    Update,
    Delete,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Create => "CREATE",
            OpType::Update => "UPDATE",
            OpType::Delete => "DELETE",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutation an operation performs.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Create a product.
    ///
    /// `local_id` is an optional temporary id that later operations may use
    /// to refer to the product before the server has assigned its real id.
    Create {
        payload: ProductPayload,
        local_id: Option<ProductId>,
    },

    /// Update fields of an existing product.
    Update {
        id: ProductId,
        payload: ProductPayload,
    },

    /// Delete a product.
    Delete { id: ProductId },
}

impl Action {
    /// Creates a Create action.
    pub fn create(payload: ProductPayload) -> Self {
        Action::Create {
            payload,
            local_id: None,
        }
    }

    /// Creates a Create action that carries a temporary id.
    pub fn create_local(payload: ProductPayload, local_id: ProductId) -> Self {
        Action::Create {
            payload,
            local_id: Some(local_id),
        }
    }

    /// Creates an Update action.
    pub fn update(id: ProductId, payload: ProductPayload) -> Self {
        Action::Update { id, payload }
    }

    /// Creates a Delete action.
    pub fn delete(id: ProductId) -> Self {
        Action::Delete { id }
    }

    pub fn op_type(&self) -> OpType {
        match self {
            Action::Create { .. } => OpType::Create,
            Action::Update { .. } => OpType::Update,
            Action::Delete { .. } => OpType::Delete,
        }
    }

    /// Returns the payload, if the action carries one.
    pub fn payload(&self) -> Option<&ProductPayload> {
        match self {
            Action::Create { payload, .. } | Action::Update { payload, .. } => Some(payload),
            Action::Delete { .. } => None,
        }
    }

    /// Returns the id the action is keyed by.
    ///
    /// For Create this is the temporary id, if any.
    pub fn id(&self) -> Option<ProductId> {
        match self {
            Action::Create { local_id, .. } => *local_id,
            Action::Update { id, .. } | Action::Delete { id } => Some(*id),
        }
    }

    /// Returns the action with its payload sanitized.
    pub fn sanitize(self) -> Self {
        match self {
            Action::Create { payload, local_id } => Action::Create {
                payload: payload.sanitize(),
                local_id,
            },
            Action::Update { id, payload } => Action::Update {
                id,
                payload: payload.sanitize(),
            },
            delete @ Action::Delete { .. } => delete,
        }
    }
}

/// A queued mutation intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Record", into = "Record")]
pub struct Operation {
    /// Enqueue time in epoch milliseconds. Diagnostic only.
    pub timestamp: i64,
    pub action: Action,
}

impl Operation {
    /// Creates a new operation with the given timestamp and action.
    pub fn new(timestamp: i64, action: Action) -> Self {
        Operation { timestamp, action }
    }

    pub fn op_type(&self) -> OpType {
        self.action.op_type()
    }

    /// Returns true if the operation can be sent.
    ///
    /// Creating a product requires a non-blank name.
    pub fn is_valid(&self) -> bool {
        match &self.action {
            Action::Create { payload, .. } => payload.has_name(),
            Action::Update { .. } | Action::Delete { .. } => true,
        }
    }

    /// Rewrites temporary ids using the given mapping.
    ///
    /// Returns true if the operation changed.
    pub fn remap(&mut self, ids: &HashMap<ProductId, ProductId>) -> bool {
        match &mut self.action {
            Action::Update { id, .. } | Action::Delete { id } => match ids.get(id) {
                Some(resolved) => {
                    *id = *resolved;
                    true
                }
                None => false,
            },
            Action::Create { .. } => false,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Action::Create { payload, local_id } => {
                write!(f, "{} \"{}\"", OpType::Create, payload.name)?;
                if let Some(id) = local_id {
                    write!(f, " (as {})", id)?;
                }
                Ok(())
            }
            Action::Update { id, payload } => {
                write!(f, "{} {}", OpType::Update, id)?;
                if !payload.name.is_empty() {
                    write!(f, " \"{}\"", payload.name)?;
                }
                Ok(())
            }
            Action::Delete { id } => write!(f, "{} {}", OpType::Delete, id),
        }
    }
}

/// Durable representation of an operation.
#[derive(Serialize, Deserialize)]
struct Record {
    #[serde(rename = "type")]
    op_type: OpType,
    #[serde(default)]
    data: RecordData,
    #[serde(default)]
    timestamp: i64,
}

#[derive(Default, Serialize, Deserialize)]
struct RecordData {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_i64"
    )]
    id: Option<ProductId>,
    #[serde(flatten)]
    payload: ProductPayload,
}

impl TryFrom<Record> for Operation {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        let RecordData { id, payload } = record.data;
        let action = match record.op_type {
            OpType::Create => Action::Create {
                payload,
                local_id: id,
            },
            OpType::Update => Action::Update {
                id: id.ok_or_else(|| Error::InvalidRecord("UPDATE without id".to_string()))?,
                payload,
            },
            OpType::Delete => Action::Delete {
                id: id.ok_or_else(|| Error::InvalidRecord("DELETE without id".to_string()))?,
            },
        };
        Ok(Operation::new(record.timestamp, action.sanitize()))
    }
}

impl From<Operation> for Record {
    fn from(op: Operation) -> Self {
        let op_type = op.op_type();
        let data = match op.action {
            Action::Create { payload, local_id } => RecordData {
                id: local_id,
                payload,
            },
            Action::Update { id, payload } => RecordData {
                id: Some(id),
                payload,
            },
            Action::Delete { id } => RecordData {
                id: Some(id),
                payload: ProductPayload::default(),
            },
        };
        Record {
            op_type,
            data,
            timestamp: op.timestamp,
        }
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
