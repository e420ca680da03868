//! Specialist Agent
//!
//! Shared generate / invoke-tools loop behind the intake and
//! evidence-collection agents. Each pass:
//!
//! 1. **Generate**: role instruction + `chat_history` + `messages` go to the
//!    provider together with the bound tool definitions; the response turn is
//!    appended to `messages`.
//! 2. If that turn requests no tools the pass ends.
//! 3. **Invoke-Tools**: every requested call is answered by exactly one
//!    correlated tool-result turn, then control returns to Generate.
//!
//! Tool rounds are capped by `max_tool_rounds`; exceeding the cap is an
//! [`AppError::ToolRoundLimit`].

use tracing::{debug, info, warn};

use crate::llm::provider::LLM;
use crate::models::AgentState;
use crate::tools::ToolRegistry;
use crate::types::{AppError, AppResult, LLMRequest, ToolCall, Turn};

pub struct SpecialistAgent {
    name: String,
    system_instruction: String,
    llm: LLM,
    model: String,
    tools: ToolRegistry,
    max_tool_rounds: u32,
}

impl SpecialistAgent {
    pub fn new(
        name: impl Into<String>,
        system_instruction: impl Into<String>,
        llm: LLM,
        model: impl Into<String>,
        tools: ToolRegistry,
        max_tool_rounds: u32,
    ) -> Self {
        Self {
            name: name.into(),
            system_instruction: system_instruction.into(),
            llm,
            model: model.into(),
            tools,
            max_tool_rounds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.names()
    }

    /// Run one pass until the provider answers without tool requests.
    ///
    /// `chat_history` is returned exactly as received.
    pub async fn run(&self, mut state: AgentState) -> AppResult<AgentState> {
        info!(
            agent = %self.name,
            history_len = state.chat_history.len(),
            message_count = state.messages.len(),
            "Specialist pass started"
        );

        let mut rounds: u32 = 0;
        loop {
            let turn = self.generate(&state).await?;
            let calls = turn.tool_calls().to_vec();
            state.messages.push(turn);

            if calls.is_empty() {
                info!(agent = %self.name, tool_rounds = rounds, "Specialist pass complete");
                return Ok(state);
            }

            if rounds >= self.max_tool_rounds {
                warn!(
                    agent = %self.name,
                    rounds = rounds,
                    pending_calls = calls.len(),
                    "Tool round limit reached"
                );
                return Err(AppError::ToolRoundLimit {
                    agent: self.name.clone(),
                    rounds,
                });
            }

            rounds += 1;
            self.invoke_tools(&mut state, &calls).await;
        }
    }

    async fn generate(&self, state: &AgentState) -> AppResult<Turn> {
        let mut request = LLMRequest::new(&self.model, &self.system_instruction, state.prompt_turns());
        if !self.tools.is_empty() {
            request = request.with_tools(self.tools.definitions());
        }

        let response = self.llm.create_chat_completion(&request).await?;
        debug!(
            agent = %self.name,
            tool_calls = response.tool_calls.len(),
            response_len = response.content.len(),
            "Generate step finished"
        );
        Ok(response.into_turn())
    }

    /// One tool-result turn per call, in request order. Calls run sequentially.
    async fn invoke_tools(&self, state: &mut AgentState, calls: &[ToolCall]) {
        for call in calls {
            let result = self.tools.invoke(&self.name, call).await;
            state.messages.push(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{failure, scripted_llm, text, tool_request, ScriptedAdapter};
    use crate::tools::testing::EchoTool;
    use crate::tools::Tool;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn agent(adapter: &Arc<ScriptedAdapter>, tools: Vec<Arc<dyn Tool>>, max_rounds: u32) -> SpecialistAgent {
        SpecialistAgent::new(
            "intake_agent",
            "피해 접수 상담원",
            scripted_llm(adapter),
            "gpt-4o-mini",
            ToolRegistry::new(tools, Duration::from_secs(1)),
            max_rounds,
        )
    }

    fn state() -> AgentState {
        AgentState {
            messages: vec![Turn::user("중고거래 사기를 당했어요")],
            chat_history: vec![Turn::user("안녕하세요"), Turn::assistant("무엇을 도와드릴까요?")],
        }
    }

    #[tokio::test]
    async fn test_plain_reply_takes_exactly_one_generate() {
        let adapter = ScriptedAdapter::new(vec![text("피해 일시와 금액을 알려주세요.")]);
        let echo = EchoTool::new("web_search");
        let agent = agent(&adapter, vec![echo.clone() as Arc<dyn Tool>], 5);

        let result = agent.run(state()).await.unwrap();

        assert_eq!(adapter.call_count(), 1);
        assert_eq!(echo.call_count(), 0);
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.final_reply(), Some("피해 일시와 금액을 알려주세요."));
    }

    #[tokio::test]
    async fn test_each_tool_call_gets_one_correlated_result() {
        let adapter = ScriptedAdapter::new(vec![
            tool_request(&[
                ("call_a", "web_search", json!({"query": "중고거래 사기 신고"})),
                ("call_b", "perplexity_qa_tool", json!({"query": "진정서 제출처"})),
            ]),
            text("가까운 경찰서 민원실에 제출하시면 됩니다."),
        ]);
        let web = EchoTool::new("web_search");
        let deep = EchoTool::new("perplexity_qa_tool");
        let agent = agent(
            &adapter,
            vec![web.clone() as Arc<dyn Tool>, deep.clone() as Arc<dyn Tool>],
            5,
        );

        let input = state();
        let result = agent.run(input.clone()).await.unwrap();

        // user, tool request, two results, final reply
        assert_eq!(result.messages.len(), 5);
        let ids: Vec<&str> = result.messages[2..4]
            .iter()
            .map(|turn| match turn {
                Turn::ToolResult { tool_call_id, .. } => tool_call_id.as_str(),
                other => panic!("expected tool result, got {:?}", other),
            })
            .collect();
        assert_eq!(ids, vec!["call_a", "call_b"]);
        assert_eq!(web.call_count(), 1);
        assert_eq!(deep.call_count(), 1);

        // Both results are visible to the second Generate
        let requests = adapter.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), input.chat_history.len() + 4);
        assert_eq!(requests[0].tools.len(), 2);

        assert_eq!(result.chat_history, input.chat_history);
    }

    #[tokio::test]
    async fn test_prompt_is_history_then_messages() {
        let adapter = ScriptedAdapter::new(vec![text("네")]);
        let agent = agent(&adapter, Vec::new(), 5);

        agent.run(state()).await.unwrap();

        let request = &adapter.requests()[0];
        assert_eq!(request.system_instruction.as_deref(), Some("피해 접수 상담원"));
        assert_eq!(request.messages[0], Turn::user("안녕하세요"));
        assert_eq!(request.messages[2], Turn::user("중고거래 사기를 당했어요"));
        assert!(request.tools.is_empty());
    }

    #[tokio::test]
    async fn test_round_limit_stops_the_loop() {
        let adapter = ScriptedAdapter::new(vec![
            tool_request(&[("call_1", "web_search", json!({"query": "a"}))]),
            tool_request(&[("call_2", "web_search", json!({"query": "b"}))]),
            text("unreachable"),
        ]);
        let echo = EchoTool::new("web_search");
        let agent = agent(&adapter, vec![echo.clone() as Arc<dyn Tool>], 1);

        let result = agent.run(state()).await;

        assert!(matches!(result, Err(AppError::ToolRoundLimit { rounds: 1, .. })));
        assert_eq!(adapter.call_count(), 2);
        assert_eq!(echo.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_back_to_the_model() {
        let adapter = ScriptedAdapter::new(vec![
            tool_request(&[("call_x", "shell", json!({}))]),
            text("검색 도구를 사용할 수 없어 일반 안내를 드립니다."),
        ]);
        let agent = agent(&adapter, vec![EchoTool::new("web_search") as Arc<dyn Tool>], 5);

        let result = agent.run(state()).await.unwrap();

        assert!(result.messages[2].content().contains("error"));
        assert!(result.final_reply().is_some());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let adapter = ScriptedAdapter::new(vec![failure("upstream 500")]);
        let agent = agent(&adapter, Vec::new(), 5);

        assert!(matches!(agent.run(state()).await, Err(AppError::LLMApi(_))));
    }
}
