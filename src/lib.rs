//! Catalog-Walker: a stateful navigator for a hidden-field driven course catalog
//!
//! This crate replays the page transitions a person would perform in the
//! catalog's browser UI (letter, department, course, offering, term, section),
//! carrying the server's hidden state from page to page, and collects
//! department, course and section records from every partition of the
//! alphabet concurrently.

pub mod auth;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod navigation;
pub mod output;
pub mod state;
pub mod storage;
pub mod transport;

use thiserror::Error;

/// Main error type for Catalog-Walker operations
#[derive(Debug, Error)]
pub enum WalkerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] navigation::NavError),

    #[error("Authentication error: {0}")]
    Auth(#[from] auth::AuthError),

    #[error("Sink error: {0}")]
    Sink(#[from] storage::SinkError),

    #[error("Transport error: {0}")]
    Transport(#[from] transport::TransportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Catalog-Walker operations
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_catalog, PartitionKey, RunSummary};
pub use navigation::{CatalogWalker, NavigationResult, Navigator, NodeKind};
pub use state::{Cursor, Session};
pub use storage::{RecordKey, Sink};
pub use transport::{Document, SessionToken, Transport};
