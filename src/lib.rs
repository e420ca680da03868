// Poli Agent - multi-agent assistant that helps fraud victims prepare a complaint letter

pub mod config;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod tools;     // Named tools bound to the specialist agents
pub mod search;    // Search APIs (SerpAPI Google Light)
pub mod session;   // Per-session history and draft state
pub mod routes;
pub mod middleware;
pub mod utils;

use std::sync::Arc;

use agents::{CompletionScorer, DraftingWorkflow, LetterDrafter, Supervisor};
use llm::provider::LLM;
use session::{ChatService, DraftService};
use types::AppResult;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

/// Wire the supervisor, the drafting workflow and the shared scorer/drafter.
pub fn build_state(config: Config) -> AppResult<AppState> {
    let llm = LLM::from_config(&config.llm)?;
    let scorer = Arc::new(CompletionScorer::new(llm.clone(), &config.llm.agent_model));
    let drafter = Arc::new(LetterDrafter::new(llm, &config.llm.letter_model));

    let supervisor = Supervisor::from_config(&config)?;
    let workflow = DraftingWorkflow::from_config(&config, scorer.clone(), drafter.clone())?;

    Ok(AppState {
        chat: Arc::new(ChatService::new(supervisor)),
        drafts: Arc::new(DraftService::new(workflow)),
        scorer,
        drafter,
        config,
    })
}

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
