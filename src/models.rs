use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::agents::drafter::LetterDrafter;
use crate::agents::scorer::CompletionScorer;
use crate::config::Config;
use crate::session::{ChatService, DraftService};
use crate::types::{OutputSchema, Turn};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub chat: Arc<ChatService>,
    pub drafts: Arc<DraftService>,
    pub scorer: Arc<CompletionScorer>,
    pub drafter: Arc<LetterDrafter>,
}

/// Routing decision produced by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    /// Fraud report intake
    Intake,
    /// Gathering the facts and evidence needed for the complaint letter
    EvidenceCollection,
    /// Answered directly by the supervisor
    DirectChat,
    Finish,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Intake,
        Route::EvidenceCollection,
        Route::DirectChat,
        Route::Finish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Intake => "INTAKE",
            Route::EvidenceCollection => "EVIDENCE_COLLECTION",
            Route::DirectChat => "DIRECT_CHAT",
            Route::Finish => "FINISH",
        }
    }

    /// Constrained-decoding schema for the routing call
    pub fn output_schema() -> OutputSchema {
        let tags: Vec<&str> = Self::ALL.iter().map(Route::as_str).collect();
        OutputSchema {
            name: "route_response".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "next": { "type": "string", "enum": tags }
                },
                "required": ["next"],
                "additionalProperties": false
            }),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reply of the routing call
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteResponse {
    pub next: Route,
}

/// Projection of the session handed to a specialist agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Turn>,
    pub chat_history: Vec<Turn>,
}

impl AgentState {
    /// Text of the final assistant reply, if the cycle ended with one
    pub fn final_reply(&self) -> Option<&str> {
        match self.messages.last() {
            Some(Turn::Assistant { content }) if !content.trim().is_empty() => Some(content),
            _ => None,
        }
    }

    /// Prompt order: durable history, then the current cycle
    pub fn prompt_turns(&self) -> Vec<Turn> {
        self.chat_history.iter().chain(self.messages.iter()).cloned().collect()
    }
}

/// Shared state of one supervisor dispatch cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Turns of the current dispatch cycle
    pub messages: Vec<Turn>,
    /// Durable conversation memory, append-only
    pub chat_history: Vec<Turn>,
    pub next: Option<Route>,
}

impl SessionState {
    pub fn new_cycle(chat_history: Vec<Turn>, incoming: Vec<Turn>) -> Self {
        Self {
            messages: incoming,
            chat_history,
            next: None,
        }
    }

    pub fn projection(&self) -> AgentState {
        AgentState {
            messages: self.messages.clone(),
            chat_history: self.chat_history.clone(),
        }
    }

    pub fn prompt_turns(&self) -> Vec<Turn> {
        self.chat_history.iter().chain(self.messages.iter()).cloned().collect()
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|turn| match turn {
            Turn::Assistant { content } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Fold the finished cycle into the durable history.
    ///
    /// `base_len` is the history length when the cycle started. The first
    /// `base_len` turns are kept verbatim and the cycle's user and assistant
    /// turns follow in order, so turns the router already recorded during the
    /// cycle are not duplicated.
    pub fn into_history(self, base_len: usize) -> Vec<Turn> {
        let mut history = self.chat_history;
        history.truncate(base_len);
        history.extend(self.messages.into_iter().filter(Turn::is_conversational));
        history
    }
}

/// State of the letter-drafting workflow for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LetterDraftState {
    pub messages: Vec<Turn>,
    pub chat_history: Vec<Turn>,
    completion_ratio: f64,
    finalize_requested: bool,
    /// Set while the yes/no finalize question is the latest open prompt
    awaiting_confirmation: bool,
    /// Rendered letter, once the workflow reaches the rendering branch
    pub letter: Option<String>,
}

impl LetterDraftState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completion_ratio(&self) -> f64 {
        self.completion_ratio
    }

    pub fn set_completion_ratio(&mut self, ratio: f64) {
        self.completion_ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    }

    pub fn finalize_requested(&self) -> bool {
        self.finalize_requested
    }

    /// Sticky: there is no way back to `false`.
    pub fn request_finalize(&mut self) {
        self.finalize_requested = true;
        self.awaiting_confirmation = false;
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn set_awaiting_confirmation(&mut self, awaiting: bool) {
        self.awaiting_confirmation = awaiting;
    }

    /// Start a new pass: the previous pass's turns move into the history.
    pub fn begin_turn(&mut self, user_message: impl Into<String>) {
        let finished = std::mem::take(&mut self.messages);
        self.chat_history
            .extend(finished.into_iter().filter(Turn::is_conversational));
        self.messages.push(Turn::user(user_message));
    }

    /// Full conversation so far (history then current pass), tool plumbing excluded
    pub fn transcript(&self) -> Vec<Turn> {
        self.chat_history
            .iter()
            .chain(self.messages.iter())
            .filter(|turn| turn.is_conversational())
            .cloned()
            .collect()
    }

    /// The user's latest reply in the current pass
    pub fn last_user_turn(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|turn| match turn {
            Turn::User { content } => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn projection(&self) -> AgentState {
        AgentState {
            messages: self.messages.clone(),
            chat_history: self.chat_history.clone(),
        }
    }
}

/// Render turns as a plain-text transcript ("사용자:" / "상담원:" lines)
pub fn render_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .filter_map(|turn| match turn {
            Turn::User { content } => Some(format!("사용자: {}", content)),
            Turn::Assistant { content } => Some(format!("상담원: {}", content)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// API request and response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn into_turn(self) -> Turn {
        if self.role.eq_ignore_ascii_case("user") {
            Turn::user(self.content)
        } else {
            Turn::assistant(self.content)
        }
    }

    pub fn from_turn(turn: &Turn) -> Option<Self> {
        match turn {
            Turn::User { content } => Some(Self { role: "user".to_string(), content: content.clone() }),
            Turn::Assistant { content } => Some(Self { role: "assistant".to_string(), content: content.clone() }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub messages: Vec<ChatMessage>,
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    pub message: String,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub completion_ratio: f64,
    pub finalize_requested: bool,
    pub letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterRequest {
    pub chat_content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterResponse {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionCheckRequest {
    pub chat_history: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub llm_provider: String,
}
