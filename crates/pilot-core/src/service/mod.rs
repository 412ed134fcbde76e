mod drafts;
mod folders;
mod principles;
mod sessions;

pub use folders::{FolderInput, PromptInput, SavedFolder};
pub use sessions::{SendOutcome, SessionUpdate};

use tokio::sync::{Mutex, MutexGuard};

use crate::config::PilotConfig;
use crate::error::Result;
use crate::llm::LlmService;
use crate::migrate;
use crate::store::{create_store, Collection, CollectionStore, Store};

/// One async mutex per collection. Held across a read-modify-write so two
/// requests touching the same collection cannot drop each other's update.
#[derive(Default)]
struct CollectionLocks {
    sessions: Mutex<()>,
    folders: Mutex<()>,
    principles: Mutex<()>,
    drafts: Mutex<()>,
}

impl CollectionLocks {
    fn get(&self, collection: Collection) -> &Mutex<()> {
        match collection {
            Collection::Sessions => &self.sessions,
            Collection::Folders => &self.folders,
            Collection::Principles => &self.principles,
            Collection::Drafts => &self.drafts,
        }
    }
}

/// All Prompt Pilot operations over an injected collection store.
pub struct PilotService {
    store: Store,
    llm: LlmService,
    locks: CollectionLocks,
}

impl PilotService {
    pub fn new(store: Store, llm: LlmService) -> Self {
        Self {
            store,
            llm,
            locks: CollectionLocks::default(),
        }
    }

    pub fn from_config(config: &PilotConfig) -> Self {
        Self::new(create_store(config), LlmService::from_config(&config.llm))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn llm(&self) -> &LlmService {
        &self.llm
    }

    /// Startup: seed the collections, then run the legacy drafts import.
    /// A failed import is logged and does not stop startup.
    pub async fn init(&self) -> Result<usize> {
        self.store.ensure().await?;

        let _folders = self.lock(Collection::Folders).await;
        let _drafts = self.lock(Collection::Drafts).await;
        match migrate::migrate_drafts(&self.store).await {
            Ok(imported) => Ok(imported),
            Err(e) => {
                tracing::error!("draft migration failed: {e}");
                Ok(0)
            }
        }
    }

    async fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        self.locks.get(collection).lock().await
    }
}

#[cfg(test)]
pub(crate) fn memory_service(llm: crate::config::LlmConfig) -> PilotService {
    PilotService::new(
        Store::Memory(crate::store::MemoryStore::new()),
        LlmService::from_config(&llm),
    )
}
