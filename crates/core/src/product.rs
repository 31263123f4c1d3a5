// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Product payloads carried by queued operations.
//!
//! Payloads arrive from forms and from durable storage, so deserialization is
//! lenient: numbers may be given as numeric strings, and fields of the wrong
//! shape are dropped instead of failing the whole record. [`ProductPayload::sanitize`]
//! then normalizes the result. Sanitizing is idempotent, so re-sanitizing a
//! payload loaded from storage never changes previously valid data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Identifier of a product on the remote service.
///
/// Negative values are temporary ids assigned by the client for products
/// that have not been created on the server yet.
pub type ProductId = i64;

/// Returns true if the id is a client-assigned temporary id.
pub fn is_temporary(id: ProductId) -> bool {
    id < 0
}

/// The sanitized subset of product fields sent to the remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub name: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub description: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_f64"
    )]
    pub price: Option<f64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_i64"
    )]
    pub stock: Option<i64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub category: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub image: Option<String>,
}

impl ProductPayload {
    /// Creates a payload with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        ProductPayload {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Normalizes the payload.
    ///
    /// - `name` is trimmed
    /// - blank optional strings become `None`
    /// - non-finite prices are dropped
    pub fn sanitize(self) -> Self {
        ProductPayload {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            price: self.price.filter(|p| p.is_finite()),
            stock: self.stock,
            category: non_blank(self.category),
            image: non_blank(self.image),
        }
    }

    /// The JSON object sent as a request body.
    ///
    /// Matches the serialized form, except that a non-finite price (which
    /// JSON cannot represent) is left out.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        if !self.name.is_empty() {
            body.insert("name".into(), Value::String(self.name.clone()));
        }
        if let Some(description) = &self.description {
            body.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(price) = self.price.and_then(Number::from_f64) {
            body.insert("price".into(), Value::Number(price));
        }
        if let Some(stock) = self.stock {
            body.insert("stock".into(), Value::Number(stock.into()));
        }
        if let Some(category) = &self.category {
            body.insert("category".into(), Value::String(category.clone()));
        }
        if let Some(image) = &self.image {
            body.insert("image".into(), Value::String(image.clone()));
        }
        Value::Object(body)
    }

    /// Returns true if the payload has a non-blank name.
    ///
    /// A name is required to create a product.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(lenient_opt_string(de)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(coerce_f64(&Value::deserialize(de)?))
}

pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
    Ok(coerce_i64(&Value::deserialize(de)?))
}

/// Coerces a JSON value to a finite number, accepting numeric strings.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Coerces a JSON value to an integer, accepting integral floats and numeric strings.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
