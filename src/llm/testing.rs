// Scripted capability provider for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::provider::{LLMAdapter, LLM};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, ToolCall};

/// Replays queued responses in order and records every request it receives.
pub(crate) struct ScriptedAdapter {
    script: Mutex<VecDeque<AppResult<LLMResponse>>>,
    requests: Mutex<Vec<LLMRequest>>,
    delay: Option<Duration>,
}

impl ScriptedAdapter {
    pub(crate) fn new(script: Vec<AppResult<LLMResponse>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// Adapter that sleeps for `delay` before answering each request
    pub(crate) fn slow(script: Vec<AppResult<LLMResponse>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    pub(crate) fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LLMApi("script exhausted".to_string())))
    }
}

pub(crate) fn scripted_llm(adapter: &Arc<ScriptedAdapter>) -> LLM {
    scripted_llm_with_timeout(adapter, Duration::from_secs(5))
}

pub(crate) fn scripted_llm_with_timeout(adapter: &Arc<ScriptedAdapter>, timeout: Duration) -> LLM {
    LLM::from_adapter(adapter.clone(), "scripted", timeout)
}

pub(crate) fn text(content: &str) -> AppResult<LLMResponse> {
    Ok(LLMResponse::text(content))
}

pub(crate) fn structured(value: Value) -> AppResult<LLMResponse> {
    Ok(LLMResponse {
        content: value.to_string(),
        structured: Some(value),
        ..LLMResponse::text("")
    })
}

/// Response requesting the given `(id, tool name, arguments)` calls
pub(crate) fn tool_request(calls: &[(&str, &str, Value)]) -> AppResult<LLMResponse> {
    Ok(LLMResponse {
        tool_calls: calls
            .iter()
            .map(|(id, name, args)| ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args.as_object().cloned().unwrap_or_default(),
            })
            .collect(),
        finish_reason: "tool_calls".to_string(),
        ..LLMResponse::text("")
    })
}

pub(crate) fn failure(reason: &str) -> AppResult<LLMResponse> {
    Err(AppError::LLMApi(reason.to_string()))
}
