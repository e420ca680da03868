use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::LLMConfig;
use crate::llm::openai::{
    OpenAICompatAdapter, GROQ_API_BASE, OPENAI_API_BASE, OPENROUTER_API_BASE, PERPLEXITY_API_BASE,
};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};
use crate::utils::with_timeout;

/// Capability provider: text or structured generation over an ordered conversation.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for LLM provider (renamed to avoid conflict with the `LLMConfig` section)
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
}

#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider_name: String,
    timeout: Duration,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig, timeout: Duration) -> AppResult<Self> {
        if provider.api_key.is_empty() {
            return Err(AppError::Config(format!(
                "No API key configured for provider {}",
                provider.name
            )));
        }

        let api_base = match provider.name.as_str() {
            "openai" => OPENAI_API_BASE,
            "groq" => GROQ_API_BASE,
            "openrouter" => OPENROUTER_API_BASE,
            // Used by the deep-search tool only; no tool calling or structured output
            "perplexity" => PERPLEXITY_API_BASE,
            other => return Err(AppError::Config(format!("Unsupported provider: {}", other))),
        };

        Ok(Self {
            adapter: Arc::new(OpenAICompatAdapter::with_api_base(&provider.api_key, api_base)),
            provider_name: provider.name,
            timeout,
        })
    }

    /// Build the default provider described by the `llm` config section
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let api_key = config.active_api_key().ok_or_else(|| {
            AppError::Config(format!(
                "No API key configured for provider {}",
                config.default_provider
            ))
        })?;

        Self::new(
            LLMProviderConfig {
                name: config.default_provider.clone(),
                api_key,
            },
            config.timeout(),
        )
    }

    /// Wrap an existing adapter (alternative backends, tests)
    pub fn from_adapter(adapter: Arc<dyn LLMAdapter>, provider_name: &str, timeout: Duration) -> Self {
        Self {
            adapter,
            provider_name: provider_name.to_string(),
            timeout,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let operation = format!("{} chat completion ({})", self.provider_name, request.model);
        with_timeout(self.timeout, &operation, self.adapter.create_chat_completion(request)).await
    }

    /// Run a request carrying an output schema and decode the structured value.
    pub async fn create_structured<T: DeserializeOwned>(&self, request: &LLMRequest) -> AppResult<T> {
        if request.output_schema.is_none() {
            return Err(AppError::InvalidRequest(
                "structured completion requested without an output schema".to_string(),
            ));
        }

        let response = self.create_chat_completion(request).await?;
        let value = response.structured.ok_or_else(|| {
            AppError::MalformedOutput("provider returned no structured value".to_string())
        })?;

        serde_json::from_value(value).map_err(|e| AppError::MalformedOutput(e.to_string()))
    }
}
