use super::PilotService;
use crate::error::{PilotError, Result};
use crate::llm::Completion;
use crate::model::Draft;
use crate::store::{Collection, CollectionStore};

impl PilotService {
    pub async fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.store.load(Collection::Drafts).await
    }

    /// Store a legacy draft. Drafts are folded into "Imported Drafts" the
    /// next time the server starts.
    pub async fn add_draft(&self, text: &str) -> Result<Draft> {
        if text.trim().is_empty() {
            return Err(PilotError::InvalidInput("Draft text is required".into()));
        }

        let _guard = self.lock(Collection::Drafts).await;
        let mut drafts: Vec<Draft> = self.store.load(Collection::Drafts).await?;
        let draft = Draft::new(text);
        drafts.push(draft.clone());
        self.store.save(Collection::Drafts, &drafts).await?;
        Ok(draft)
    }

    /// One-shot optimization of a standalone text against the stored
    /// principles. Nothing is persisted.
    pub async fn optimize(&self, text: &str) -> Result<Completion> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PilotError::InvalidInput("Text is required".into()));
        }
        let principles: Vec<String> = self.store.load(Collection::Principles).await?;
        self.llm.optimize_text(text, &principles).await
    }
}
