//! Run coordination
//!
//! Wires the transport, authenticator, extractor and sinks into one shared
//! walker, hands the partitions to the scheduler, and finishes the run by
//! flushing the sinks and writing the summary.

use crate::auth::{self, Authenticator};
use crate::config::{parse_letters, Config};
use crate::crawler::{scheduler, PartitionKey};
use crate::extract::{CatalogExtractor, Extractor};
use crate::navigation::{CatalogWalker, Navigator};
use crate::output::{generate_markdown_summary, RunSummary};
use crate::storage::{open_sinks, Sink};
use crate::transport::{HttpTransport, Transport};
use crate::WalkerError;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main run coordinator
pub struct Coordinator {
    config: Arc<Config>,
    walker: Arc<CatalogWalker>,
    sink: Arc<dyn Sink>,
    config_hash: String,
}

impl Coordinator {
    /// Creates a coordinator talking to the configured endpoint
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `config_hash` - Hash of the config file, recorded in the summary
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Transport and sinks are ready
    /// * `Err(WalkerError)` - The HTTP client or a sink could not be opened
    pub fn new(config: Config, config_hash: impl Into<String>) -> Result<Self, WalkerError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(&config)?);
        let authenticator = auth::from_config(&config.session);
        let sink = open_sinks(&config.output)?;

        Ok(Self::with_parts(
            config,
            config_hash,
            transport,
            authenticator,
            Arc::new(CatalogExtractor),
            sink,
        ))
    }

    /// Creates a coordinator from explicit parts
    pub fn with_parts(
        config: Config,
        config_hash: impl Into<String>,
        transport: Arc<dyn Transport>,
        authenticator: Arc<dyn Authenticator>,
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        let navigator = Navigator::from_config(transport, &config);
        let walker = CatalogWalker::new(
            navigator,
            authenticator,
            extractor,
            Arc::clone(&sink),
            config.crawler.placeholder_title.clone(),
        );

        Self {
            config: Arc::new(config),
            walker: Arc::new(walker),
            sink,
            config_hash: config_hash.into(),
        }
    }

    /// Partitions to walk: the configured letters, or the whole alphabet
    pub fn partitions(&self) -> Result<Vec<PartitionKey>, WalkerError> {
        match &self.config.crawler.letters {
            Some(letters) => Ok(parse_letters(letters)?),
            None => Ok(PartitionKey::alphabet()),
        }
    }

    /// Walks every partition and returns the finished summary
    ///
    /// Partition failures are reported in the summary, never returned as an
    /// error. Only a failing sink flush or summary write fails the run.
    pub async fn run(&self) -> Result<RunSummary, WalkerError> {
        let partitions = self.partitions()?;
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!(
            "Starting catalog walk over {} partitions",
            partitions.len()
        );

        let walker = Arc::clone(&self.walker);
        let mut summary = scheduler::run(
            partitions,
            self.config.crawler.workers as usize,
            move |key| {
                let walker = Arc::clone(&walker);
                async move { walker.walk(key).await }
            },
        )
        .await;

        self.sink.flush()?;

        summary.started_at = started_at.to_rfc3339();
        summary.finished_at = Some(Utc::now().to_rfc3339());
        summary.duration_seconds = Some(start_time.elapsed().as_secs());
        summary.config_hash = self.config_hash.clone();

        if let Some(path) = &self.config.output.summary_path {
            generate_markdown_summary(&summary, Path::new(path))?;
            tracing::info!("Summary written to {}", path);
        }

        tracing::info!(
            "Catalog walk finished: {}/{} partitions completed in {:?}",
            summary.completed(),
            summary.attempted(),
            start_time.elapsed()
        );

        Ok(summary)
    }
}

/// Runs a complete catalog walk with the production transport and sinks
pub async fn run_catalog(config: Config, config_hash: &str) -> Result<RunSummary, WalkerError> {
    Coordinator::new(config, config_hash)?.run().await
}
