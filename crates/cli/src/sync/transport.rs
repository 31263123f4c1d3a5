// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the catalog API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP calls for production
//! - Mock transports for unit testing

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use shelf_core::product::coerce_i64;
use shelf_core::{Action, Operation, ProductId};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The remote host could not be reached.
    #[error("cannot reach server: {0}")]
    Unreachable(String),

    /// The call did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server rejected request with status {status}{}", fmt_body(.body))]
    Rejected { status: u16, body: String },

    /// Anything else: malformed URL, unreadable response, TLS failure.
    #[error("protocol error: {0}")]
    Protocol(String),
}

fn fmt_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

impl TransportError {
    /// True if the failure happened before a connection was established.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Unreachable(_))
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// HTTP method of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Patch,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection every call is made against.
pub const PRODUCTS_PATH: &str = "/products";

/// A single request against the catalog API.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub method: Method,
    /// Path relative to the API base URL.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl RemoteCall {
    /// Maps a queued operation to its API call.
    pub fn for_operation(op: &Operation) -> Self {
        match &op.action {
            Action::Create { payload, .. } => RemoteCall {
                method: Method::Post,
                path: PRODUCTS_PATH.to_string(),
                body: Some(payload.to_json()),
            },
            Action::Update { id, payload } => RemoteCall {
                method: Method::Patch,
                path: product_path(*id),
                body: Some(payload.to_json()),
            },
            Action::Delete { id } => RemoteCall {
                method: Method::Delete,
                path: product_path(*id),
                body: None,
            },
        }
    }

    /// The health probe: a HEAD on the products collection.
    pub fn probe() -> Self {
        RemoteCall {
            method: Method::Head,
            path: PRODUCTS_PATH.to_string(),
            body: None,
        }
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

fn product_path(id: ProductId) -> String {
    format!("{}/{}", PRODUCTS_PATH, id)
}

/// A successful response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteReply {
    pub status: u16,
    pub body: String,
}

impl RemoteReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RemoteReply {
            status,
            body: body.into(),
        }
    }

    /// The id the server assigned to a created product, if the body names one.
    ///
    /// Accepts `{"id": 42}` and the wrapped form `{"data": {"id": 42}}`.
    pub fn created_id(&self) -> Option<ProductId> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        value
            .get("id")
            .or_else(|| value.get("data").and_then(|data| data.get("id")))
            .and_then(coerce_i64)
    }
}

/// Boxed future returned by transport calls.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Transport trait for the catalog API.
///
/// Calls take `&self` so one transport can be shared by concurrent tasks.
pub trait Transport: Send + Sync {
    /// Performs a call. Non-success statuses are returned as
    /// [`TransportError::Rejected`].
    fn execute(&self, call: RemoteCall) -> TransportFuture<'_, RemoteReply>;

    /// Checks whether the server is reachable and healthy.
    fn probe(&self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.execute(RemoteCall::probe()).await?;
            Ok(())
        })
    }
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the API rooted at `base_url`.
    ///
    /// `timeout` bounds connection establishment and each whole request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TransportError::Protocol(format!(
                "api url must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        Ok(HttpTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Unreachable(e.to_string())
    } else {
        TransportError::Protocol(e.to_string())
    }
}

impl Transport for HttpTransport {
    fn execute(&self, call: RemoteCall) -> TransportFuture<'_, RemoteReply> {
        Box::pin(async move {
            let url = self.url(&call.path);
            let request = match call.method {
                Method::Post => self.http.post(&url),
                Method::Patch => self.http.patch(&url),
                Method::Delete => self.http.delete(&url),
                Method::Head => self.http.head(&url),
            };
            let mut request = request.header(reqwest::header::ACCEPT, "application/json");
            if let Some(body) = &call.body {
                request = request.json(body);
            }

            tracing::debug!(call = %call, "sending request");
            let response = request.send().await.map_err(classify)?;
            let status = response.status().as_u16();
            let success = response.status().is_success();
            let body = response.text().await.map_err(classify)?;

            if !success {
                return Err(TransportError::Rejected { status, body });
            }
            Ok(RemoteReply { status, body })
        })
    }
}
