use super::PilotService;
use crate::error::Result;
use crate::model::PrinciplesInput;
use crate::store::{Collection, CollectionStore};

impl PilotService {
    pub async fn get_principles(&self) -> Result<Vec<String>> {
        self.store.load(Collection::Principles).await
    }

    /// Replace the stored principles with the normalized input. There is no
    /// merging: the previous list is discarded.
    pub async fn save_principles(&self, input: &PrinciplesInput) -> Result<Vec<String>> {
        let entries = input.normalize();
        let _guard = self.lock(Collection::Principles).await;
        self.store.save(Collection::Principles, &entries).await?;
        tracing::debug!("saved {} principles", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::memory_service;

    #[tokio::test]
    async fn test_save_text_principles() {
        let service = memory_service(Default::default());
        let saved = service
            .save_principles(&PrinciplesInput::Text("a\n\nb\n  c  ".into()))
            .await
            .unwrap();
        assert_eq!(saved, vec!["a", "b", "c"]);
        assert_eq!(service.get_principles().await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_list() {
        let service = memory_service(Default::default());
        service
            .save_principles(&PrinciplesInput::Text("one\ntwo".into()))
            .await
            .unwrap();
        let input: PrinciplesInput = serde_json::from_str(r#"["three"]"#).unwrap();
        service.save_principles(&input).await.unwrap();
        assert_eq!(service.get_principles().await.unwrap(), vec!["three"]);
    }

    #[tokio::test]
    async fn test_empty_by_default() {
        let service = memory_service(Default::default());
        assert!(service.get_principles().await.unwrap().is_empty());
    }
}
