//! Search Module
//!
//! Fast web search for fraud cases, reporting procedures and agencies,
//! backed by SerpAPI's Google Light engine.

pub mod serpapi;

pub use serpapi::{SerpApiClient, WebResult, SearchError};
