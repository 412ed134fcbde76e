use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PilotService;
use crate::error::{PilotError, Result};
use crate::model::{derive_title, Message, Session, SessionSummary};
use crate::store::{Collection, CollectionStore};

const SESSION_NOT_FOUND: &str = "Session not found";

/// Title and timestamp of a session after a message exchange.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// Result of [`PilotService::send_message`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
    pub session: SessionUpdate,
}

impl PilotService {
    /// Non-archived sessions, most recently updated first.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let sessions: Vec<Session> = self.store.load(Collection::Sessions).await?;
        let mut summaries: Vec<SessionSummary> = sessions
            .iter()
            .filter(|s| !s.archived)
            .map(Session::summary)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    pub async fn create_session(&self) -> Result<Session> {
        let _guard = self.lock(Collection::Sessions).await;
        let mut sessions: Vec<Session> = self.store.load(Collection::Sessions).await?;
        let session = Session::new();
        sessions.push(session.clone());
        self.store.save(Collection::Sessions, &sessions).await?;
        tracing::debug!("created session {}", session.id);
        Ok(session)
    }

    /// Full session, archived or not.
    pub async fn get_session(&self, id: &str) -> Result<Session> {
        let sessions: Vec<Session> = self.store.load(Collection::Sessions).await?;
        sessions
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| PilotError::NotFound(SESSION_NOT_FOUND.into()))
    }

    /// Append a user message, ask the model for a reply and append it.
    ///
    /// Nothing is written until the completion has succeeded, so a failed
    /// call leaves the stored session untouched. The first user message
    /// also renames the session.
    pub async fn send_message(&self, id: &str, content: &str) -> Result<SendOutcome> {
        let content = content.trim();
        if content.is_empty() {
            return Err(PilotError::InvalidInput(
                "Message content is required".into(),
            ));
        }

        let mut snapshot = self.get_session(id).await?;
        let user_message = Message::user(content);
        snapshot.messages.push(user_message.clone());

        let principles: Vec<String> = self.store.load(Collection::Principles).await?;
        let completion = self
            .llm
            .optimize_conversation(&snapshot.messages, &principles)
            .await?;
        let assistant_message = Message::assistant(completion.text);

        // Apply onto a fresh copy so writes made during the model call survive.
        let _guard = self.lock(Collection::Sessions).await;
        let mut sessions: Vec<Session> = self.store.load(Collection::Sessions).await?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PilotError::NotFound(SESSION_NOT_FOUND.into()))?;

        // Decided on the stored copy: a concurrent send may have landed first.
        let retitle = session.user_message_count() == 0;
        session.messages.push(user_message.clone());
        session.messages.push(assistant_message.clone());
        session.updated_at = assistant_message.timestamp;
        if retitle {
            session.title = derive_title(content);
        }
        let update = SessionUpdate {
            id: session.id.clone(),
            title: session.title.clone(),
            updated_at: session.updated_at,
        };

        self.store.save(Collection::Sessions, &sessions).await?;

        Ok(SendOutcome {
            user_message,
            assistant_message,
            session: update,
        })
    }

    /// Set or clear the archived flag and bump `updated_at`.
    pub async fn set_archived(&self, id: &str, archived: bool) -> Result<Session> {
        let _guard = self.lock(Collection::Sessions).await;
        let mut sessions: Vec<Session> = self.store.load(Collection::Sessions).await?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PilotError::NotFound(SESSION_NOT_FOUND.into()))?;

        session.archived = archived;
        session.updated_at = Utc::now();
        let updated = session.clone();

        self.store.save(Collection::Sessions, &sessions).await?;
        tracing::debug!("session {id} archived={archived}");
        Ok(updated)
    }
}
