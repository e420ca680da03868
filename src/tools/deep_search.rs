// Deep lookup tool backed by Perplexity's online models

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::config::SearchConfig;
use crate::llm::provider::{LLMProviderConfig, LLM};
use crate::tools::{required_str, Tool};
use crate::types::{AppResult, LLMRequest, ToolArgs, Turn};

const DEEP_SEARCH_INSTRUCTION: &str = "당신은 사기 피해 신고와 진정서 작성 절차에 관한 질문에 답하는 검색 도우미입니다. \
한국의 법령, 경찰 신고 절차, 관련 기관 정보를 근거와 함께 간결하게 정리하세요.";

pub struct DeepSearchTool {
    llm: LLM,
    model: String,
}

impl DeepSearchTool {
    pub const NAME: &'static str = "perplexity_qa_tool";

    pub fn new(llm: LLM, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> AppResult<Self> {
        let llm = LLM::new(
            LLMProviderConfig {
                name: "perplexity".to_string(),
                api_key: config.perplexity_api_key.clone(),
            },
            config.tool_timeout(),
        )?;
        Ok(Self::new(llm, config.perplexity_model.clone()))
    }
}

#[async_trait]
impl Tool for DeepSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "진정서 작성, 법률 정보, 신고 절차처럼 정확하고 상세한 근거가 필요한 질의를 심층 검색합니다."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "사용자의 질의 내용" }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, args: &ToolArgs) -> AppResult<Value> {
        let query = required_str(Self::NAME, args, "query")?;
        info!(tool = Self::NAME, query_len = query.len(), "Running deep search");

        let request = LLMRequest::new(&self.model, DEEP_SEARCH_INSTRUCTION, vec![Turn::user(query)])
            .with_temperature(0.2);
        let response = self.llm.create_chat_completion(&request).await?;

        Ok(json!({ "content": response.content }))
    }
}
