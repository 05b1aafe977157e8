//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the walker:
//! - Building the HTTP client with timeout and user agent
//! - Sending GET requests with the query parameter map and session cookies
//! - Classifying failures into transient and permanent errors
//! - Retrying transient failures through the `RetryPolicy`

use crate::config::Config;
use crate::config::TargetConfig;
use crate::transport::{Document, RetryPolicy, SessionToken, Transport, TransportError};
use crate::WalkerError;
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("catalog-walker/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client for the catalog endpoint
///
/// Cookies are never stored by the client: each session supplies its own
/// token set explicitly on every request.
///
/// # Arguments
///
/// * `config` - Target section supplying the timeout and user agent
///
/// # Returns
///
/// * `Ok(Client)` - Configured HTTP client
/// * `Err(reqwest::Error)` - The TLS backend could not be initialised
pub fn build_http_client(config: &TargetConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Transport that issues GET requests against one fixed endpoint
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(client: Client, endpoint: Url, retry: RetryPolicy) -> Self {
        Self {
            client,
            endpoint,
            retry,
        }
    }

    /// Builds the transport from the target and retry sections of the config
    pub fn from_config(config: &Config) -> Result<Self, WalkerError> {
        let client = build_http_client(&config.target)?;
        let endpoint = Url::parse(&config.target.endpoint)?;
        Ok(Self::new(
            client,
            endpoint,
            RetryPolicy::from_config(&config.retry),
        ))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn get_once(
        &self,
        params: &[(String, String)],
        token: &SessionToken,
    ) -> Result<Document, TransportError> {
        let mut request = self.client.get(self.endpoint.clone()).query(params);
        if let Some(cookie) = token.cookie_header() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(Document::new(body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        params: &[(String, String)],
        token: &SessionToken,
    ) -> Result<Document, TransportError> {
        self.retry
            .run(|attempt| {
                tracing::trace!("GET {} (attempt {})", self.endpoint, attempt);
                self.get_once(params, token)
            })
            .await
    }
}

/// Maps a reqwest failure onto the transport taxonomy
fn classify_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_body() || e.is_decode() {
        TransportError::Body(e.to_string())
    } else if let Some(status) = e.status() {
        TransportError::Status(status.as_u16())
    } else if e.is_request() {
        // Resets and other mid-flight failures surface as request errors
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}
