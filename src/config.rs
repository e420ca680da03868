use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub agents: AgentConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub groq_api_key: String,
    pub openrouter_api_key: String,
    pub default_provider: String,
    /// Model used by the supervisor for routing and direct chat
    pub router_model: String,
    /// Model used by the specialist agents and the completion scorer
    pub agent_model: String,
    /// Model used to render the final letter
    pub letter_model: String,
    pub timeout_secs: u64,
}

impl LLMConfig {
    /// API key of the configured default provider, if any
    pub fn active_api_key(&self) -> Option<String> {
        let key = match self.default_provider.as_str() {
            "openai" => &self.openai_api_key,
            "groq" => &self.groq_api_key,
            "openrouter" => &self.openrouter_api_key,
            _ => return None,
        };
        if key.is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub perplexity_api_key: String,
    pub perplexity_model: String,
    pub serpapi_key: String,
    pub max_results: usize,
    pub tool_timeout_secs: u64,
}

impl SearchConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Upper bound on consecutive Generate/Invoke-Tools rounds per agent pass
    pub max_tool_rounds: u32,
    /// Completion ratio from which the user is asked to finalize the letter
    pub completion_threshold: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 5,
            completion_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub dir: String,
    pub file_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            llm: LLMConfig {
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
                openrouter_api_key: env::var("OPENROUTER_API_KEY").unwrap_or_default(),
                default_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
                router_model: env::var("ROUTER_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                agent_model: env::var("AGENT_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                letter_model: env::var("LETTER_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            search: SearchConfig {
                perplexity_api_key: env::var("PERPLEXITY_API_KEY").unwrap_or_default(),
                perplexity_model: env::var("PERPLEXITY_MODEL").unwrap_or_else(|_| "sonar".to_string()),
                serpapi_key: env::var("SERPAPI_KEY").unwrap_or_default(),
                max_results: env::var("SEARCH_MAX_RESULTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                tool_timeout_secs: env::var("TOOL_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            },
            agents: AgentConfig {
                max_tool_rounds: env::var("MAX_TOOL_ROUNDS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                completion_threshold: env::var("COMPLETION_THRESHOLD")
                    .unwrap_or_else(|_| "0.8".to_string())
                    .parse()?,
            },
            log: LogConfig {
                dir: env::var("LOG_DIR").unwrap_or_else(|_| "log".to_string()),
                file_prefix: env::var("LOG_FILE_PREFIX").unwrap_or_else(|_| "poli_agent.log".to_string()),
            },
        })
    }
}

#[cfg(test)]
impl Config {
    /// Defaults without any credentials
    pub(crate) fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                port: 8000,
                host: "127.0.0.1".to_string(),
                cors_allowed_origins: vec!["*".to_string()],
            },
            llm: LLMConfig {
                openai_api_key: String::new(),
                groq_api_key: String::new(),
                openrouter_api_key: String::new(),
                default_provider: "openai".to_string(),
                router_model: "gpt-4o-mini".to_string(),
                agent_model: "gpt-4o-mini".to_string(),
                letter_model: "gpt-4o-mini".to_string(),
                timeout_secs: 5,
            },
            search: SearchConfig {
                perplexity_api_key: String::new(),
                perplexity_model: "sonar".to_string(),
                serpapi_key: String::new(),
                max_results: 5,
                tool_timeout_secs: 5,
            },
            agents: AgentConfig::default(),
            log: LogConfig {
                dir: "log".to_string(),
                file_prefix: "poli_agent.log".to_string(),
            },
        }
    }
}
