// Fast web search tool over SerpAPI

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::SearchConfig;
use crate::search::{SearchError, SerpApiClient};
use crate::tools::{required_str, Tool};
use crate::types::{AppError, AppResult, ToolArgs};

pub struct FastSearchTool {
    client: SerpApiClient,
}

impl FastSearchTool {
    pub const NAME: &'static str = "web_search";

    pub fn new(client: SerpApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &SearchConfig) -> AppResult<Self> {
        let client = SerpApiClient::from_config(config).map_err(search_error)?;
        Ok(Self::new(client))
    }
}

fn search_error(err: SearchError) -> AppError {
    AppError::Tool {
        tool: FastSearchTool::NAME.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl Tool for FastSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "최신 사기 사례, 신고 창구, 관련 기관 연락처처럼 빠르게 확인할 정보를 웹에서 검색합니다."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "검색어" }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, args: &ToolArgs) -> AppResult<Value> {
        let query = required_str(Self::NAME, args, "query")?;
        let results = self.client.search_web(query).await.map_err(search_error)?;
        Ok(json!({ "query": query, "results": results }))
    }
}
