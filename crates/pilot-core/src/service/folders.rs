use serde::{Deserialize, Deserializer};

use super::PilotService;
use crate::error::{PilotError, Result};
use crate::model::{Folder, Prompt};
use crate::store::{Collection, CollectionStore};

const FOLDER_NOT_FOUND: &str = "Folder not found";

/// Create-or-update request for a folder. `id` selects update mode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Outer `None`: field absent. `Some(None)`: explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub parent_id: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A folder plus whether it was newly created.
#[derive(Debug, Clone)]
pub struct SavedFolder {
    pub folder: Folder,
    pub created: bool,
}

impl PilotService {
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.store.load(Collection::Folders).await
    }

    /// Rename/re-parent an existing folder when `id` is given, otherwise
    /// create a new one. The parent is only changed when the request names
    /// it, and is never checked against existing folders.
    pub async fn save_folder(&self, input: &FolderInput) -> Result<SavedFolder> {
        let name = input.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(PilotError::InvalidInput("Folder name is required".into()));
        }

        let _guard = self.lock(Collection::Folders).await;
        let mut folders: Vec<Folder> = self.store.load(Collection::Folders).await?;

        let saved = match input.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => {
                let folder = folders
                    .iter_mut()
                    .find(|f| f.id == id)
                    .ok_or_else(|| PilotError::NotFound(FOLDER_NOT_FOUND.into()))?;
                folder.name = name.to_string();
                if let Some(parent_id) = &input.parent_id {
                    folder.parent_id = parent_id.clone();
                }
                SavedFolder {
                    folder: folder.clone(),
                    created: false,
                }
            }
            None => {
                let parent_id = input.parent_id.clone().flatten();
                let folder = Folder::new(name, parent_id);
                folders.push(folder.clone());
                SavedFolder {
                    folder,
                    created: true,
                }
            }
        };

        self.store.save(Collection::Folders, &folders).await?;
        Ok(saved)
    }

    pub async fn add_prompt(&self, folder_id: &str, input: &PromptInput) -> Result<Prompt> {
        let content = input.content.as_deref().map(str::trim).unwrap_or_default();
        if content.is_empty() {
            return Err(PilotError::InvalidInput("Prompt content is required".into()));
        }

        let _guard = self.lock(Collection::Folders).await;
        let mut folders: Vec<Folder> = self.store.load(Collection::Folders).await?;
        let folder = folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or_else(|| PilotError::NotFound(FOLDER_NOT_FOUND.into()))?;

        let prompt = Prompt::new(input.title.as_deref(), content);
        folder.prompts.push(prompt.clone());

        self.store.save(Collection::Folders, &folders).await?;
        Ok(prompt)
    }
}
