use crate::extract::{Record, SectionRecord};
use crate::storage::merge::merge_document;
use crate::storage::traits::{Collection, RecordKey, Sink, SinkError, SinkResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    documents: BTreeMap<RecordKey, Value>,
    writes: Vec<(RecordKey, Record)>,
}

/// Keeps everything in memory
///
/// Used for dry runs and tests: besides the merged documents it keeps the
/// full write log in order.
#[derive(Default)]
pub struct MemorySink {
    inner: Mutex<Inner>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written, in write order
    pub fn writes(&self) -> Vec<(RecordKey, Record)> {
        self.inner
            .lock()
            .map(|inner| inner.writes.clone())
            .unwrap_or_default()
    }

    pub fn document(&self, key: &RecordKey) -> Option<Value> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.documents.get(key).cloned())
    }

    /// Number of distinct keys stored in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.inner
            .lock()
            .map(|inner| {
                inner
                    .documents
                    .keys()
                    .filter(|k| k.collection == collection)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Every section record written, in write order
    pub fn sections(&self) -> Vec<SectionRecord> {
        self.writes()
            .into_iter()
            .filter_map(|(_, record)| match record {
                Record::Section(section) => Some(section),
                _ => None,
            })
            .collect()
    }
}

impl Sink for MemorySink {
    fn write(&self, key: &RecordKey, record: &Record) -> SinkResult<()> {
        let mut inner = self.inner.lock().map_err(|_| SinkError::Poisoned)?;
        let existing = inner.documents.get(key).cloned();
        let merged = merge_document(key, existing, record)?;
        inner.documents.insert(key.clone(), merged);
        inner.writes.push((key.clone(), record.clone()));
        Ok(())
    }
}
