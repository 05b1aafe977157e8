//! JSON file tree sink
//!
//! Layout: `<root>/departments/ANAT.json`,
//! `<root>/courses/ANAT_100_Undergraduate_Main.json` and
//! `<root>/sections/2018_Fall_Undergraduate_Main_ANAT_100.json`.

use crate::extract::Record;
use crate::storage::merge::merge_document;
use crate::storage::traits::{RecordKey, Sink, SinkError, SinkResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonFileSink {
    root: PathBuf,
    // Serializes read-merge-write cycles on section files
    lock: Mutex<()>,
}

impl JsonFileSink {
    pub fn new(root: impl Into<PathBuf>) -> SinkResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a key is stored in
    pub fn path_for(&self, key: &RecordKey) -> PathBuf {
        self.root
            .join(key.collection.as_str())
            .join(format!("{}.json", sanitize(&key.name)))
    }

    /// Reads the stored document of a key
    pub fn load(&self, key: &RecordKey) -> SinkResult<Option<Value>> {
        read_document(&self.path_for(key))
    }
}

fn read_document(path: &Path) -> SinkResult<Option<Value>> {
    match fs::read_to_string(path) {
        Ok(body) => Ok(Some(serde_json::from_str(&body)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Keeps key names usable as file names
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

impl Sink for JsonFileSink {
    fn write(&self, key: &RecordKey, record: &Record) -> SinkResult<()> {
        let path = self.path_for(key);
        let _guard = self.lock.lock().map_err(|_| SinkError::Poisoned)?;

        let existing = if key.collection.appends() {
            read_document(&path)?
        } else {
            None
        };
        let merged = merge_document(key, existing, record)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&merged)?)?;
        fs::rename(&tmp, &path)?;

        tracing::trace!("Wrote {}", path.display());
        Ok(())
    }
}
