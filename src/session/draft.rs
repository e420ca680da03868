use tracing::info;
use uuid::Uuid;

use crate::agents::{DraftingWorkflow, PassOutcome};
use crate::models::LetterDraftState;
use crate::session::SessionStore;
use crate::types::{AppError, AppResult, Turn};

/// Outcome of one drafting pass
#[derive(Debug, Clone)]
pub struct DraftTurn {
    pub session_id: Uuid,
    pub outcome: PassOutcome,
    /// Assistant turns produced by this pass, in order
    pub replies: Vec<String>,
    pub completion_ratio: f64,
    pub finalize_requested: bool,
    pub letter: Option<String>,
}

/// Drives the drafting workflow against per-session draft state.
pub struct DraftService {
    workflow: DraftingWorkflow,
    sessions: SessionStore<LetterDraftState>,
}

impl DraftService {
    pub fn new(workflow: DraftingWorkflow) -> Self {
        Self {
            workflow,
            sessions: SessionStore::new(),
        }
    }

    pub async fn process_turn(&self, session_id: Option<Uuid>, message: &str) -> AppResult<DraftTurn> {
        if message.trim().is_empty() {
            return Err(AppError::InvalidRequest("message must not be empty".to_string()));
        }

        let session_id = session_id.unwrap_or_else(Uuid::new_v4);
        let slot = self.sessions.entry(session_id).await;
        let mut state = slot.lock().await;

        state.begin_turn(message);
        let outcome = self.workflow.run_pass(&mut state).await?;

        let replies = state
            .messages
            .iter()
            .skip(1)
            .filter_map(|turn| match turn {
                Turn::Assistant { content } => Some(content.clone()),
                _ => None,
            })
            .collect();

        info!(
            session_id = %session_id,
            outcome = ?outcome,
            ratio = state.completion_ratio(),
            "Drafting pass finished"
        );

        Ok(DraftTurn {
            session_id,
            outcome,
            replies,
            completion_ratio: state.completion_ratio(),
            finalize_requested: state.finalize_requested(),
            letter: state.letter.clone(),
        })
    }

    pub async fn state(&self, session_id: &Uuid) -> Option<LetterDraftState> {
        let slot = self.sessions.get(session_id).await?;
        let state = slot.lock().await;
        Some(state.clone())
    }

    pub async fn reset(&self, session_id: &Uuid) -> bool {
        self.sessions.remove(session_id).await
    }
}
