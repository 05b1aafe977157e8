//! Transport layer for talking to the catalog endpoint
//!
//! This module contains everything that touches the network and nothing that
//! knows about catalog state:
//! - The `Transport` trait the navigator sends requests through
//! - `HttpTransport`, the reqwest-backed implementation
//! - The bounded retry policy with exponential backoff
//! - `Document` and `SessionToken`, the values crossing the boundary

mod backoff;
mod fetcher;

pub use backoff::{ExponentialBackoff, RetryPolicy};
pub use fetcher::{build_http_client, HttpTransport};

use async_trait::async_trait;
use scraper::Html;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<TransportError>,
    },
}

impl TransportError {
    /// Returns true if the failure may go away on its own and is worth retrying
    ///
    /// Timeouts, connection failures, truncated bodies, HTTP 429 and HTTP 5xx
    /// are transient. Other statuses and malformed requests are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect(_) | Self::Body(_) => true,
            Self::Status(code) => *code == 429 || (500..600).contains(code),
            Self::Request(_) | Self::RetriesExhausted { .. } => false,
        }
    }
}

/// A fetched page
///
/// Only the markup is kept. Parsed trees are built on demand and never held
/// across an await point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    body: String,
}

impl Document {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the markup into a queryable tree
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Opaque credential set attached to every request of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToken {
    pub cookies: BTreeMap<String, String>,
}

impl SessionToken {
    pub fn new(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }

    /// Renders the cookie set as a single `Cookie` header value
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Query parameters of one request, in the order they are sent
pub type RequestParams = Vec<(String, String)>;

/// Sends one request to the fixed catalog endpoint
///
/// Implementations own their retry behavior; an `Err` means the request is
/// given up on.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(
        &self,
        params: &[(String, String)],
        token: &SessionToken,
    ) -> Result<Document, TransportError>;
}
