// Type definitions shared by the agents, the capability providers and the tools

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Argument mapping passed to a tool.
pub type ToolArgs = Map<String, Value>;

/// One requested tool invocation carried by an assistant tool-request turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id echoed back by the matching tool-result turn
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArgs,
}

/// One message unit in a conversation, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    User {
        content: String,
    },
    Assistant {
        content: String,
    },
    ToolRequest {
        #[serde(default)]
        content: String,
        tool_calls: Vec<ToolCall>,
    },
    ToolResult {
        tool_call_id: String,
        name: String,
        content: String,
    },
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Turn::User { content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::Assistant { content: content.into() }
    }

    pub fn tool_result(call: &ToolCall, content: impl Into<String>) -> Self {
        Turn::ToolResult {
            tool_call_id: call.id.clone(),
            name: call.name.clone(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Turn::User { content }
            | Turn::Assistant { content }
            | Turn::ToolRequest { content, .. }
            | Turn::ToolResult { content, .. } => content,
        }
    }

    /// Tool calls requested by this turn (empty for every other role)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Turn::ToolRequest { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Turn::User { .. })
    }

    /// User and plain assistant turns; tool plumbing is excluded.
    pub fn is_conversational(&self) -> bool {
        matches!(self, Turn::User { .. } | Turn::Assistant { .. })
    }
}

/// Function-style tool description handed to the capability provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument mapping
    pub parameters: Value,
}

/// Constrained-decoding contract for a structured response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub messages: Vec<Turn>,
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
}

impl LLMRequest {
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>, messages: Vec<Turn>) -> Self {
        Self {
            model: model.into(),
            system_instruction: Some(system_instruction.into()),
            messages,
            temperature: None,
            tools: Vec::new(),
            output_schema: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Parsed value when the request carried an output schema
    #[serde(default)]
    pub structured: Option<Value>,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

impl LLMResponse {
    /// Plain text completion
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: "stop".to_string(),
            ..Default::default()
        }
    }

    /// Converts the response into the turn appended to the conversation.
    pub fn into_turn(self) -> Turn {
        if self.tool_calls.is_empty() {
            Turn::Assistant { content: self.content }
        } else {
            Turn::ToolRequest {
                content: self.content,
                tool_calls: self.tool_calls,
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Malformed structured output: {0}")]
    MalformedOutput(String),

    #[error("Tool error ({tool}): {reason}")]
    Tool { tool: String, reason: String },

    #[error("Tool not registered: {0}")]
    ToolNotFound(String),

    #[error("Agent {agent} exceeded {rounds} tool rounds")]
    ToolRoundLimit { agent: String, rounds: u32 },

    #[error("Timed out after {secs}s: {operation}")]
    Timeout { operation: String, secs: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::LLMApi(err.to_string())
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::LLMApi(_)
            | AppError::MalformedOutput(_)
            | AppError::Tool { .. }
            | AppError::ToolNotFound(_)
            | AppError::ToolRoundLimit { .. } => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_tool_calls_becomes_assistant_turn() {
        let turn = LLMResponse::text("안녕하세요").into_turn();
        assert_eq!(turn, Turn::assistant("안녕하세요"));
        assert!(turn.tool_calls().is_empty());
    }

    #[test]
    fn test_response_with_tool_calls_becomes_tool_request() {
        let response = LLMResponse {
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: "web_search".to_string(),
                arguments: ToolArgs::new(),
            }],
            ..LLMResponse::text("")
        };
        let turn = response.into_turn();
        assert_eq!(turn.tool_calls().len(), 1);
        assert!(!turn.is_conversational());
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::InvalidRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Timeout { operation: "llm".into(), secs: 60 }.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(AppError::LLMApi("down".into()).into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_turn_serializes_with_role_tag() {
        let json = serde_json::to_value(Turn::user("사기를 당했어요")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "사기를 당했어요");
    }
}
