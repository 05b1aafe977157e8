//! Storage module for persisting extracted records
//!
//! This module handles:
//! - The `Sink` trait and record keys
//! - Merge rules for departments, courses and sections
//! - The JSON file tree, SQLite and in-memory sinks
//! - Fanning records out to several sinks

mod json;
mod memory;
mod merge;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonFileSink;
pub use memory::MemorySink;
pub use merge::{merge_document, section_count, SECTIONS_FIELD};
pub use sqlite::SqliteSink;
pub use traits::{Collection, RecordKey, Sink, SinkError, SinkResult};

use crate::config::OutputConfig;
use crate::extract::Record;
use std::path::Path;
use std::sync::Arc;

/// Writes every record to each of its sinks
///
/// Every sink is attempted; the first error is returned after all writes.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for FanoutSink {
    fn write(&self, key: &RecordKey, record: &Record) -> SinkResult<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write(key, record) {
                tracing::warn!("Sink failed to write {}: {}", key, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&self) -> SinkResult<()> {
        for sink in &self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

/// Opens the sinks named by the output configuration
///
/// # Arguments
///
/// * `output` - The output section of the configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn Sink>)` - The JSON tree, fanned out to SQLite when configured
/// * `Err(SinkError)` - Failed to create the directory or open the database
pub fn open_sinks(output: &OutputConfig) -> SinkResult<Arc<dyn Sink>> {
    let json: Arc<dyn Sink> = Arc::new(JsonFileSink::new(&output.directory)?);

    match &output.database_path {
        Some(path) => {
            let sqlite: Arc<dyn Sink> = Arc::new(SqliteSink::new(Path::new(path))?);
            Ok(Arc::new(FanoutSink::new(vec![json, sqlite])))
        }
        None => Ok(json),
    }
}
