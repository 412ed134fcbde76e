use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// The flat JSON collections kept on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Sessions,
    Folders,
    Principles,
    /// Legacy drafts, folded into folders at startup.
    Drafts,
}

impl Collection {
    /// Collections seeded with `[]` by [`CollectionStore::ensure`].
    pub const SEEDED: [Collection; 3] = [
        Collection::Sessions,
        Collection::Folders,
        Collection::Principles,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::Folders => "folders",
            Self::Principles => "principles",
            Self::Drafts => "drafts",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whole-collection persistence. Every call reads or writes the entire
/// ordered list; there is no per-item access.
pub trait CollectionStore: Send + Sync {
    /// Create the backing location and seed empty collections.
    fn ensure(&self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Current list. Absent or unreadable collections load as empty; the
    /// unreadable case is logged.
    fn load<T: DeserializeOwned + Send>(
        &self,
        collection: Collection,
    ) -> impl std::future::Future<Output = Result<Vec<T>>> + Send;

    /// Replace the whole list.
    fn save<T: Serialize + Sync>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn contains(&self, collection: Collection) -> impl std::future::Future<Output = bool> + Send;

    /// Move a collection out of the way (`<file>.migrated`). Returns `false`
    /// when there was nothing to retire.
    fn retire(
        &self,
        collection: Collection,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}
