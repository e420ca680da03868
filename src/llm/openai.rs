// OpenAI-compatible chat-completions adapter
// Serves OpenAI, Groq, OpenRouter and Perplexity, which all speak the same
// /chat/completions wire format. Tool calling and json_schema response formats
// are only sent when the request asks for them.

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage, ToolArgs, ToolCall, Turn};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai";

pub struct OpenAICompatAdapter {
    client: Client,
    api_key: String,
    api_base: String,
}

// Request types
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded argument object
    #[serde(default)]
    arguments: String,
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction,
}

#[derive(Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: WireJsonSchema,
}

#[derive(Serialize)]
struct WireJsonSchema {
    name: String,
    schema: Value,
    strict: bool,
}

// Response types
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl OpenAICompatAdapter {
    pub fn with_api_base(api_key: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn convert_turn(turn: &Turn) -> WireMessage {
        match turn {
            Turn::User { content } => WireMessage {
                role: "user",
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: None,
            },
            Turn::Assistant { content } => WireMessage {
                role: "assistant",
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: None,
            },
            Turn::ToolRequest { content, tool_calls } => WireMessage {
                role: "assistant",
                content: if content.is_empty() { None } else { Some(content.clone()) },
                tool_calls: Some(
                    tool_calls
                        .iter()
                        .map(|call| WireToolCall {
                            id: call.id.clone(),
                            kind: function_type(),
                            function: WireFunctionCall {
                                name: call.name.clone(),
                                arguments: Value::Object(call.arguments.clone()).to_string(),
                            },
                        })
                        .collect(),
                ),
                tool_call_id: None,
            },
            Turn::ToolResult { tool_call_id, content, .. } => WireMessage {
                role: "tool",
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: Some(tool_call_id.clone()),
            },
        }
    }

    fn build_request<'a>(request: &'a LLMRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(instruction) = &request.system_instruction {
            messages.push(WireMessage {
                role: "system",
                content: Some(instruction.clone()),
                tool_calls: None,
                tool_call_id: None,
            });
        }
        messages.extend(request.messages.iter().map(Self::convert_turn));

        ChatRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            tools: request
                .tools
                .iter()
                .map(|tool| WireTool {
                    kind: "function",
                    function: WireFunction {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.parameters.clone(),
                    },
                })
                .collect(),
            response_format: request.output_schema.as_ref().map(|schema| WireResponseFormat {
                kind: "json_schema",
                json_schema: WireJsonSchema {
                    name: schema.name.clone(),
                    schema: schema.schema.clone(),
                    strict: true,
                },
            }),
        }
    }

    fn parse_tool_call(call: WireToolCall) -> AppResult<ToolCall> {
        let arguments = if call.function.arguments.trim().is_empty() {
            ToolArgs::new()
        } else {
            serde_json::from_str::<ToolArgs>(&call.function.arguments).map_err(|e| {
                AppError::MalformedOutput(format!(
                    "arguments for tool {} are not a JSON object: {}",
                    call.function.name, e
                ))
            })?
        };

        Ok(ToolCall {
            id: call.id,
            name: call.function.name,
            arguments,
        })
    }
}

#[async_trait]
impl LLMAdapter for OpenAICompatAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&Self::build_request(request))
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("Chat completion request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(AppError::LLMApi(format!(
                    "Provider error ({}): {}",
                    status, error_response.error.message
                )));
            }

            return Err(AppError::LLMApi(format!("Provider error ({}): {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to parse chat completion: {}", e)))?;

        let usage = chat_response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLMApi("Provider returned no choices".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(Self::parse_tool_call)
            .collect::<AppResult<Vec<_>>>()?;

        let content = choice.message.content.unwrap_or_default();

        let structured = match &request.output_schema {
            Some(schema) => Some(serde_json::from_str::<Value>(content.trim()).map_err(|e| {
                AppError::MalformedOutput(format!("{} response is not valid JSON: {}", schema.name, e))
            })?),
            None => None,
        };

        Ok(LLMResponse {
            content,
            tool_calls,
            structured,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}
