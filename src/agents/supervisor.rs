//! Supervisor
//!
//! Top-level dispatcher for one conversation cycle. Each incoming turn is
//! classified into a [`Route`] and either handed to a specialist agent or
//! answered directly. Any failure is turned into an apology turn and the
//! cycle ends; [`Supervisor::invoke`] never returns an error.

use tracing::{error, info, warn};

use crate::agents::evidence::create_evidence_agent;
use crate::agents::intake::create_intake_agent;
use crate::agents::prompts::{
    CLASSIFICATION_APOLOGY, DELEGATE_APOLOGY, DIRECT_CHAT_SYSTEM_PROMPT, ROUTER_SYSTEM_PROMPT,
};
use crate::agents::specialist::SpecialistAgent;
use crate::config::Config;
use crate::llm::provider::LLM;
use crate::models::{Route, RouteResponse, SessionState};
use crate::tools::ToolRegistry;
use crate::types::{AppError, AppResult, LLMRequest, Turn};
use crate::utils::log_agent_routing;

pub const SUPERVISOR: &str = "supervisor";

/// Router passes allowed per cycle before the cycle is forced to finish
const MAX_PASSES: usize = 4;

pub struct Supervisor {
    llm: LLM,
    model: String,
    intake: SpecialistAgent,
    evidence: SpecialistAgent,
}

impl Supervisor {
    pub fn new(llm: LLM, model: impl Into<String>, intake: SpecialistAgent, evidence: SpecialistAgent) -> Self {
        Self {
            llm,
            model: model.into(),
            intake,
            evidence,
        }
    }

    /// Wire the router and both specialists from configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let llm = LLM::from_config(&config.llm)?;
        let tools = ToolRegistry::search_tools(&config.search);

        let intake = create_intake_agent(llm.clone(), &config.llm.agent_model, tools.clone(), &config.agents);
        let evidence = create_evidence_agent(llm.clone(), &config.llm.agent_model, tools, &config.agents);

        info!(
            provider = %llm.provider_name(),
            router_model = %config.llm.router_model,
            tools = ?intake.tool_names(),
            "Supervisor initialized"
        );

        Ok(Self::new(llm, &config.llm.router_model, intake, evidence))
    }

    /// Run one dispatch cycle to completion.
    ///
    /// The returned state always has `next == Some(Route::Finish)`.
    pub async fn invoke(&self, mut state: SessionState) -> SessionState {
        for _ in 0..MAX_PASSES {
            state = match state.next {
                None | Some(Route::DirectChat) => self.route(state).await,
                Some(Route::Intake) => self.delegate(&self.intake, state).await,
                Some(Route::EvidenceCollection) => self.delegate(&self.evidence, state).await,
                Some(Route::Finish) => return state,
            };
        }

        if state.next != Some(Route::Finish) {
            warn!(next = ?state.next, passes = MAX_PASSES, "Dispatch cycle did not finish, forcing FINISH");
            state.next = Some(Route::Finish);
        }
        state
    }

    /// Classify the cycle and answer directly when the route is DIRECT_CHAT.
    pub async fn route(&self, mut state: SessionState) -> SessionState {
        let route = match self.classify(&state).await {
            Ok(route) => route,
            Err(e) => return degrade(state, SUPERVISOR, &e, CLASSIFICATION_APOLOGY),
        };

        if route != Route::DirectChat {
            state.next = Some(route);
            return state;
        }

        match self.direct_chat(&state).await {
            Ok(reply) => {
                let turn = Turn::assistant(reply);
                state.messages.push(turn.clone());
                state.chat_history.push(turn);
                state.next = Some(Route::Finish);
                state
            }
            Err(e) => degrade(state, SUPERVISOR, &e, CLASSIFICATION_APOLOGY),
        }
    }

    async fn classify(&self, state: &SessionState) -> AppResult<Route> {
        let request = LLMRequest::new(&self.model, ROUTER_SYSTEM_PROMPT, state.prompt_turns())
            .with_temperature(0.0)
            .with_output_schema(Route::output_schema());

        let response: RouteResponse = self.llm.create_structured(&request).await?;
        log_agent_routing(SUPERVISOR, response.next.as_str(), None);
        Ok(response.next)
    }

    async fn direct_chat(&self, state: &SessionState) -> AppResult<String> {
        let request = LLMRequest::new(&self.model, DIRECT_CHAT_SYSTEM_PROMPT, state.prompt_turns())
            .with_temperature(0.1);

        let response = self.llm.create_chat_completion(&request).await?;
        if response.content.trim().is_empty() {
            return Err(AppError::MalformedOutput("empty direct chat reply".to_string()));
        }
        Ok(response.content)
    }

    async fn delegate(&self, agent: &SpecialistAgent, mut state: SessionState) -> SessionState {
        info!(agent = %agent.name(), message_count = state.messages.len(), "Delegating to specialist");

        match agent.run(state.projection()).await {
            Ok(result) if result.final_reply().is_some() => {
                // Only the cycle's turns come back; chat_history stays the session's own.
                state.messages = result.messages;
                state.next = Some(Route::Finish);
                state
            }
            Ok(_) => {
                let e = AppError::MalformedOutput("specialist returned no usable reply".to_string());
                degrade(state, agent.name(), &e, DELEGATE_APOLOGY)
            }
            Err(e) => degrade(state, agent.name(), &e, DELEGATE_APOLOGY),
        }
    }
}

/// Append the apology turn and end the cycle.
fn degrade(mut state: SessionState, agent: &str, reason: &AppError, apology: &str) -> SessionState {
    error!(agent = %agent, route = ?state.next, reason = %reason, "Dispatch failed, replying with apology");
    state.messages.push(Turn::assistant(apology));
    state.next = Some(Route::Finish);
    state
}
