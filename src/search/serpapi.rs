//! SerpAPI Client
//!
//! Quick web lookups through SerpAPI's Google Light engine, localized for
//! Korean results (recent fraud patterns, police cyber bureau procedures,
//! platform dispute centers).

use serpapi_search_rust::serp_api_search::SerpApiSearch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("SerpAPI key not configured")]
    NoApiKey,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

/// One organic web result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    /// Source domain
    pub source: Option<String>,
    pub date: Option<String>,
}

/// SerpAPI client for web search
pub struct SerpApiClient {
    api_key: String,
    max_results: usize,
}

impl SerpApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            max_results: 5,
        }
    }

    /// Configure client from config
    pub fn from_config(config: &crate::config::SearchConfig) -> Result<Self, SearchError> {
        if config.serpapi_key.is_empty() {
            return Err(SearchError::NoApiKey);
        }

        Ok(Self::new(config.serpapi_key.clone()).with_max_results(config.max_results))
    }

    /// Set maximum results per search
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max.max(1);
        self
    }

    /// Search the web; an empty result page yields an empty list.
    pub async fn search_web(&self, query: &str) -> Result<Vec<WebResult>, SearchError> {
        info!(query = %query, "Searching Google Light via SerpAPI");

        let mut params = HashMap::<String, String>::new();
        params.insert("engine".to_string(), "google_light".to_string());
        params.insert("q".to_string(), query.to_string());
        params.insert("hl".to_string(), "ko".to_string());
        params.insert("gl".to_string(), "kr".to_string());
        params.insert("num".to_string(), self.max_results.to_string());

        let search = SerpApiSearch::google(params, self.api_key.clone());

        let results = search.json().await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        debug!("Raw Light response received");

        let web_results = parse_organic_results(&results, self.max_results)?;
        info!(count = web_results.len(), "Google Light search completed");
        Ok(web_results)
    }
}

/// Extract organic results from a SerpAPI response body
fn parse_organic_results(results: &Value, max_results: usize) -> Result<Vec<WebResult>, SearchError> {
    if let Some(error) = results.get("error").and_then(|v| v.as_str()) {
        // SerpAPI reports an empty page as an error string
        if error.contains("hasn't returned any results") {
            return Ok(Vec::new());
        }
        return Err(SearchError::RequestFailed(error.to_string()));
    }

    let organic_results = match results.get("organic_results") {
        Some(value) => value,
        None => return Ok(Vec::new()),
    };

    let results_array = organic_results.as_array()
        .ok_or_else(|| SearchError::ParseError("Expected array of results".to_string()))?;

    let web_results = results_array
        .iter()
        .take(max_results)
        .map(|result| {
            let link = result.get("link")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            let source = result.get("source")
                .and_then(|v| v.as_str())
                .map(String::from)
                .or_else(|| link.split('/').nth(2).map(String::from));

            WebResult {
                title: result.get("title")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Untitled")
                    .to_string(),
                snippet: result.get("snippet")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                link,
                source,
                date: result.get("date")
                    .and_then(|v| v.as_str())
                    .map(String::from),
            }
        })
        .collect();

    Ok(web_results)
}
