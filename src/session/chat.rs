use tracing::info;
use uuid::Uuid;

use crate::agents::Supervisor;
use crate::models::SessionState;
use crate::session::SessionStore;
use crate::types::{AppError, AppResult, Turn};

/// Outcome of one chat cycle
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub session_id: Uuid,
    /// Final assistant turn of the cycle; `None` when the router finished silently
    pub reply: Option<String>,
}

/// Runs supervisor cycles against per-session durable history.
pub struct ChatService {
    supervisor: Supervisor,
    sessions: SessionStore<Vec<Turn>>,
}

impl ChatService {
    pub fn new(supervisor: Supervisor) -> Self {
        Self {
            supervisor,
            sessions: SessionStore::new(),
        }
    }

    /// Run one dispatch cycle over `messages` and fold it into the session history.
    pub async fn process_chat(&self, session_id: Option<Uuid>, messages: Vec<Turn>) -> AppResult<ChatReply> {
        if !messages.iter().any(Turn::is_user) {
            return Err(AppError::InvalidRequest("at least one user message is required".to_string()));
        }

        let session_id = session_id.unwrap_or_else(Uuid::new_v4);
        let slot = self.sessions.entry(session_id).await;
        let mut history = slot.lock().await;

        let base_len = history.len();
        let incoming = messages.len();
        info!(session_id = %session_id, history_len = base_len, incoming = incoming, "Chat cycle started");

        let result = self
            .supervisor
            .invoke(SessionState::new_cycle(history.clone(), messages))
            .await;

        let reply = result.messages.get(incoming..).and_then(|produced| {
            produced.iter().rev().find_map(|turn| match turn {
                Turn::Assistant { content } => Some(content.clone()),
                _ => None,
            })
        });

        *history = result.into_history(base_len);
        info!(session_id = %session_id, history_len = history.len(), "Chat cycle finished");

        Ok(ChatReply { session_id, reply })
    }

    pub async fn history(&self, session_id: &Uuid) -> Vec<Turn> {
        match self.sessions.get(session_id).await {
            Some(slot) => slot.lock().await.clone(),
            None => Vec::new(),
        }
    }

    pub async fn clear_history(&self, session_id: &Uuid) -> bool {
        self.sessions.remove(session_id).await
    }
}
