use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::backend::{Collection, CollectionStore};
use crate::error::{PilotError, Result};

#[derive(Default)]
struct Inner {
    collections: HashMap<Collection, Value>,
    retired: HashSet<Collection>,
}

/// In-process store holding each collection as a JSON value. Used by tests
/// in place of the data directory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a raw JSON value in place of a collection, bypassing typing.
    pub fn insert_raw(&self, collection: Collection, value: Value) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.collections.insert(collection, value);
        }
    }

    pub fn is_retired(&self, collection: Collection) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.retired.contains(&collection))
            .unwrap_or(false)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| PilotError::Storage(format!("failed to acquire store lock: {e}")))
    }
}

impl CollectionStore for MemoryStore {
    async fn ensure(&self) -> Result<()> {
        let mut inner = self.lock()?;
        for collection in Collection::SEEDED {
            inner
                .collections
                .entry(collection)
                .or_insert_with(|| Value::Array(Vec::new()));
        }
        Ok(())
    }

    async fn load<T: DeserializeOwned + Send>(&self, collection: Collection) -> Result<Vec<T>> {
        let value = match self.lock()?.collections.get(&collection) {
            Some(v) => v.clone(),
            None => return Ok(Vec::new()),
        };
        match serde_json::from_value(value) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::error!("failed parsing in-memory {collection}: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn save<T: Serialize + Sync>(&self, collection: Collection, items: &[T]) -> Result<()> {
        let value = serde_json::to_value(items)?;
        self.lock()?.collections.insert(collection, value);
        Ok(())
    }

    async fn contains(&self, collection: Collection) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.collections.contains_key(&collection))
            .unwrap_or(false)
    }

    async fn retire(&self, collection: Collection) -> Result<bool> {
        let mut inner = self.lock()?;
        if inner.collections.remove(&collection).is_none() {
            return Ok(false);
        }
        inner.retired.insert(collection);
        Ok(true)
    }
}
