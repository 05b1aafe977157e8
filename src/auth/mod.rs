//! Session establishment
//!
//! The catalog sits behind a single sign-on page; the walker does not log
//! in itself. An `Authenticator` hands each partition a cookie set obtained
//! elsewhere, either inline in the configuration or from a cookie file that
//! is re-read for every new session so it can be refreshed mid-run.

use crate::config::SessionConfig;
use crate::crawler::PartitionKey;
use crate::transport::SessionToken;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while establishing a session
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read cookie file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid cookie file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no cookies available for partition {0}")]
    Empty(String),

    #[error("session rejected: {0}")]
    Rejected(String),
}

/// Produces the credential set of a new session
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, partition: &PartitionKey) -> Result<SessionToken, AuthError>;
}

/// Hands every session the same cookies
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    token: SessionToken,
}

impl StaticAuthenticator {
    pub fn new(cookies: BTreeMap<String, String>) -> Self {
        Self {
            token: SessionToken::new(cookies),
        }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, partition: &PartitionKey) -> Result<SessionToken, AuthError> {
        if self.token.cookies.is_empty() {
            return Err(AuthError::Empty(partition.to_string()));
        }
        Ok(self.token.clone())
    }
}

/// Reads cookies from a TOML file of `NAME = "value"` pairs
#[derive(Debug, Clone)]
pub struct CookieFileAuthenticator {
    path: PathBuf,
}

impl CookieFileAuthenticator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Authenticator for CookieFileAuthenticator {
    async fn authenticate(&self, partition: &PartitionKey) -> Result<SessionToken, AuthError> {
        let path = self.path.display().to_string();

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| AuthError::Io {
                path: path.clone(),
                source,
            })?;

        let cookies: BTreeMap<String, String> =
            toml::from_str(&body).map_err(|source| AuthError::Parse {
                path: path.clone(),
                source,
            })?;

        if cookies.is_empty() {
            return Err(AuthError::Empty(partition.to_string()));
        }

        tracing::debug!(
            "Loaded {} cookies from {} for partition {}",
            cookies.len(),
            path,
            partition
        );
        Ok(SessionToken::new(cookies))
    }
}

/// Builds the authenticator named by the session configuration
///
/// A cookie file takes precedence over inline cookies; validation already
/// rejects configurations naming both.
///
/// # Arguments
///
/// * `config` - The session section of the configuration
pub fn from_config(config: &SessionConfig) -> Arc<dyn Authenticator> {
    match &config.cookie_file {
        Some(path) => Arc::new(CookieFileAuthenticator::new(path)),
        None => Arc::new(StaticAuthenticator::new(config.cookies.clone())),
    }
}
