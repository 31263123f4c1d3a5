// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` by the commands that
//! send a product payload.

use clap::Args;
use shelf_core::ProductPayload;

/// Optional product fields shared by `create` and `update`.
#[derive(Args, Clone, Debug, Default)]
pub struct PayloadArgs {
    /// Unit price
    #[arg(long)]
    pub price: Option<f64>,

    /// Units in stock
    #[arg(long)]
    pub stock: Option<i64>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Category name
    #[arg(long)]
    pub category: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
}

impl PayloadArgs {
    /// Builds a payload with the given name and these fields.
    pub fn into_payload(self, name: impl Into<String>) -> ProductPayload {
        ProductPayload {
            name: name.into(),
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            image: self.image,
        }
    }
}
