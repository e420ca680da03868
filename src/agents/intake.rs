//! Intake Agent
//!
//! First contact for a fraud report: understands what happened and points
//! the user at the reporting channels.

use crate::agents::prompts::INTAKE_SYSTEM_PROMPT;
use crate::agents::specialist::SpecialistAgent;
use crate::config::AgentConfig;
use crate::llm::provider::LLM;
use crate::tools::ToolRegistry;

pub const INTAKE_AGENT: &str = "intake_agent";

pub fn create_intake_agent(
    llm: LLM,
    model: &str,
    tools: ToolRegistry,
    config: &AgentConfig,
) -> SpecialistAgent {
    SpecialistAgent::new(
        INTAKE_AGENT,
        INTAKE_SYSTEM_PROMPT,
        llm,
        model,
        tools,
        config.max_tool_rounds,
    )
}
