mod backend;
mod file;
mod memory;

pub use backend::{Collection, CollectionStore};
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::PilotConfig;
use crate::error::Result;

/// Enum wrapper for collection stores. Dispatches to the concrete implementation.
/// Using an enum instead of `Box<dyn CollectionStore>` because the trait uses RPITIT.
pub enum Store {
    File(FileStore),
    Memory(MemoryStore),
}

impl CollectionStore for Store {
    async fn ensure(&self) -> Result<()> {
        match self {
            Store::File(s) => s.ensure().await,
            Store::Memory(s) => s.ensure().await,
        }
    }

    async fn load<T: DeserializeOwned + Send>(&self, collection: Collection) -> Result<Vec<T>> {
        match self {
            Store::File(s) => s.load(collection).await,
            Store::Memory(s) => s.load(collection).await,
        }
    }

    async fn save<T: Serialize + Sync>(&self, collection: Collection, items: &[T]) -> Result<()> {
        match self {
            Store::File(s) => s.save(collection, items).await,
            Store::Memory(s) => s.save(collection, items).await,
        }
    }

    async fn contains(&self, collection: Collection) -> bool {
        match self {
            Store::File(s) => s.contains(collection).await,
            Store::Memory(s) => s.contains(collection).await,
        }
    }

    async fn retire(&self, collection: Collection) -> Result<bool> {
        match self {
            Store::File(s) => s.retire(collection).await,
            Store::Memory(s) => s.retire(collection).await,
        }
    }
}

impl Store {
    /// Human-readable location, for logs and the health endpoint.
    pub fn location(&self) -> String {
        match self {
            Store::File(s) => s.dir().display().to_string(),
            Store::Memory(_) => ":memory:".to_string(),
        }
    }
}

/// Create the file store described by the configuration.
pub fn create_store(config: &PilotConfig) -> Store {
    Store::File(FileStore::new(config.data_dir()))
}
