//! Sink trait, record keys and error types
//!
//! This module defines the interface every record sink implements and the
//! keys records are stored under.

use crate::extract::Record;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored document for {key} is malformed: {reason}")]
    Malformed { key: String, reason: String },

    #[error("Sink lock poisoned")]
    Poisoned,
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Group of records sharing a key space and a merge rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Departments,
    Courses,
    Sections,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Courses => "courses",
            Self::Sections => "sections",
        }
    }

    /// Whether a write appends to the stored document instead of replacing it
    pub fn appends(&self) -> bool {
        matches!(self, Self::Sections)
    }
}

/// Storage key of one record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub collection: Collection,
    pub name: String,
}

impl RecordKey {
    /// Derives the key a record is stored under
    ///
    /// Departments are keyed by code, courses by department, code, academic
    /// level and campus, and sections by the six-field course offering key.
    pub fn for_record(record: &Record) -> Self {
        match record {
            Record::Department(department) => Self {
                collection: Collection::Departments,
                name: department.code.clone(),
            },
            Record::Course(course) => Self {
                collection: Collection::Courses,
                name: course.storage_name(),
            },
            Record::Section(section) => Self {
                collection: Collection::Sections,
                name: section.logical_key().file_stem(),
            },
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection.as_str(), self.name)
    }
}

/// Trait for record sinks
///
/// Sinks are shared by every worker and must tolerate concurrent writes.
/// Writing the same key twice must be idempotent for departments and
/// courses; for sections it must keep one entry per class number.
pub trait Sink: Send + Sync {
    /// Persists one record
    ///
    /// # Arguments
    ///
    /// * `key` - The key derived from the record
    /// * `record` - The record to write
    fn write(&self, key: &RecordKey, record: &Record) -> SinkResult<()>;

    /// Flushes buffered data, if any
    fn flush(&self) -> SinkResult<()> {
        Ok(())
    }
}
