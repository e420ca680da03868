//! Tools
//!
//! Named external capabilities the specialist agents can request:
//!
//! - **perplexity_qa_tool**: deep, answer-style lookup for legal and procedural questions
//! - **web_search**: quick web search for recent fraud cases and reporting channels
//!
//! A [`ToolRegistry`] is resolved once when an agent is built; it is also the
//! tool invoker that turns each requested call into a correlated tool-result turn.

pub mod deep_search;
pub mod web_search;

pub use deep_search::DeepSearchTool;
pub use web_search::FastSearchTool;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::SearchConfig;
use crate::types::{AppError, AppResult, ToolArgs, ToolCall, ToolDefinition, Turn};
use crate::utils::{log_tool_usage, with_timeout};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the argument mapping
    fn parameters(&self) -> Value;

    async fn invoke(&self, args: &ToolArgs) -> AppResult<Value>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Read a required, non-blank string argument
pub(crate) fn required_str<'a>(tool: &str, args: &'a ToolArgs, key: &str) -> AppResult<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Tool {
            tool: tool.to_string(),
            reason: format!("missing string argument '{}'", key),
        })
}

/// Tools bound to one agent, keyed by name.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    timeout: Duration,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn Tool>>, timeout: Duration) -> Self {
        let mut by_name = BTreeMap::new();
        for tool in tools {
            if by_name.insert(tool.name().to_string(), tool.clone()).is_some() {
                warn!(tool = %tool.name(), "Duplicate tool name, keeping the last registration");
            }
        }
        Self { tools: by_name, timeout }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Duration::from_secs(30))
    }

    /// Deep-search and fast-search tools; a tool without credentials is skipped.
    pub fn search_tools(config: &SearchConfig) -> Self {
        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();

        match DeepSearchTool::from_config(config) {
            Ok(tool) => tools.push(Arc::new(tool)),
            Err(e) => warn!(tool = DeepSearchTool::NAME, reason = %e, "Tool disabled"),
        }
        match FastSearchTool::from_config(config) {
            Ok(tool) => tools.push(Arc::new(tool)),
            Err(e) => warn!(tool = FastSearchTool::NAME, reason = %e, "Tool disabled"),
        }

        Self::new(tools, config.tool_timeout())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Invoke one requested call and wrap the outcome as a tool-result turn.
    ///
    /// Unknown tools, failures and timeouts become an `{"error": ...}` payload
    /// so the calling agent can react on its next generation.
    pub async fn invoke(&self, agent: &str, call: &ToolCall) -> Turn {
        log_tool_usage(agent, &call.name, &Value::Object(call.arguments.clone()).to_string());

        let outcome = match self.tools.get(&call.name) {
            Some(tool) => {
                let operation = format!("tool {}", call.name);
                with_timeout(self.timeout, &operation, tool.invoke(&call.arguments)).await
            }
            None => Err(AppError::ToolNotFound(call.name.clone())),
        };

        let payload = match outcome {
            Ok(value) => value,
            Err(e) => {
                warn!(agent = %agent, tool = %call.name, reason = %e, "Tool invocation failed");
                json!({ "error": e.to_string() })
            }
        };

        Turn::tool_result(call, payload.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes its arguments back and counts invocations
    pub(crate) struct EchoTool {
        name: &'static str,
        pub(crate) calls: AtomicUsize,
    }

    impl EchoTool {
        pub(crate) fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self { name, calls: AtomicUsize::new(0) })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "echo"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn invoke(&self, args: &ToolArgs) -> AppResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "echo": Value::Object(args.clone()) }))
        }
    }
}
