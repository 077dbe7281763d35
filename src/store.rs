//! Chart persistence boundary.
//!
//! The store is a generic keyed document collection whose schema is not
//! owned here; records come back as raw JSON so the reconciliation job can
//! parse old shapes permissively.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::chart::ChartDocument;
use crate::error::StoreError;

/// One persisted record, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredChart {
    pub id: String,
    pub raw: Value,
}

pub trait ChartStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<StoredChart>, StoreError>;
    fn load(&self, id: &str) -> Result<Option<StoredChart>, StoreError>;
    /// Replaces the whole document under `id`; records are never patched.
    fn save(&self, id: &str, document: &ChartDocument) -> Result<(), StoreError>;
}

/// One `<id>.json` file per chart under a directory.
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonDirStore { root: root.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl ChartStore for JsonDirStore {
    fn list_all(&self) -> Result<Vec<StoredChart>, StoreError> {
        let mut records = Vec::new();
        if !self.root.exists() {
            return Ok(records);
        }
        let mut entries: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        entries.sort();
        for path in entries {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let raw: Value = serde_json::from_slice(&fs::read(&path)?)?;
            records.push(StoredChart {
                id: stem.to_string(),
                raw,
            });
        }
        Ok(records)
    }

    fn load(&self, id: &str) -> Result<Option<StoredChart>, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let raw: Value = serde_json::from_slice(&fs::read(&path)?)?;
        Ok(Some(StoredChart {
            id: id.to_string(),
            raw,
        }))
    }

    fn save(&self, id: &str, document: &ChartDocument) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let bytes = serde_json::to_vec_pretty(document)?;
        fs::write(self.path_for(id), bytes)?;
        Ok(())
    }
}

/// In-memory store for embedding and tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seeds a raw record, bypassing the document type. Useful for legacy
    /// and malformed shapes.
    pub fn put_raw(&self, id: &str, raw: Value) {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(id.to_string(), raw);
    }
}

impl ChartStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<StoredChart>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .map(|(id, raw)| StoredChart {
                id: id.clone(),
                raw: raw.clone(),
            })
            .collect())
    }

    fn load(&self, id: &str) -> Result<Option<StoredChart>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .map(|raw| StoredChart {
                id: id.to_string(),
                raw: raw.clone(),
            }))
    }

    fn save(&self, id: &str, document: &ChartDocument) -> Result<(), StoreError> {
        let raw = serde_json::to_value(document)?;
        self.put_raw(id, raw);
        Ok(())
    }
}
