//! Evidence-Collection Agent
//!
//! Collects the facts and supporting material a complaint letter needs,
//! field by field, without re-asking what the history already answers.

use crate::agents::prompts::evidence_system_prompt;
use crate::agents::specialist::SpecialistAgent;
use crate::config::AgentConfig;
use crate::llm::provider::LLM;
use crate::tools::ToolRegistry;

pub const EVIDENCE_AGENT: &str = "evidence_collection_agent";

pub fn create_evidence_agent(
    llm: LLM,
    model: &str,
    tools: ToolRegistry,
    config: &AgentConfig,
) -> SpecialistAgent {
    SpecialistAgent::new(
        EVIDENCE_AGENT,
        evidence_system_prompt(),
        llm,
        model,
        tools,
        config.max_tool_rounds,
    )
}
