//! One-time import of the legacy `drafts.json` into the folder library.
//!
//! Each draft becomes a prompt in the "Imported Drafts" folder, then the
//! drafts file is renamed to `drafts.json.migrated`. The rename is what keeps
//! the import from running twice.

use crate::error::Result;
use crate::model::{Draft, Folder};
use crate::store::{Collection, CollectionStore};

pub const IMPORT_FOLDER_NAME: &str = "Imported Drafts";

/// Fold legacy drafts into the "Imported Drafts" folder. Returns the number
/// of prompts imported. An empty drafts file is left untouched.
pub async fn migrate_drafts<S: CollectionStore>(store: &S) -> Result<usize> {
    if !store.contains(Collection::Drafts).await {
        return Ok(0);
    }

    let drafts: Vec<Draft> = store.load(Collection::Drafts).await?;
    if drafts.is_empty() {
        return Ok(0);
    }

    tracing::info!("migrating {} legacy drafts", drafts.len());

    let mut folders: Vec<Folder> = store.load(Collection::Folders).await?;
    let idx = match folders.iter().position(|f| f.name == IMPORT_FOLDER_NAME) {
        Some(idx) => idx,
        None => {
            folders.push(Folder::new(IMPORT_FOLDER_NAME, None));
            folders.len() - 1
        }
    };

    folders[idx]
        .prompts
        .extend(drafts.iter().map(Draft::to_prompt));

    store.save(Collection::Folders, &folders).await?;
    store.retire(Collection::Drafts).await?;

    tracing::info!("draft migration complete");
    Ok(drafts.len())
}
