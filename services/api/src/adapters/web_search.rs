//! services/api/src/adapters/web_search.rs
//!
//! A thin client for the Tavily search API, used to ground follow-up answers.

use hiring_assistant_core::{PortError, PortResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

#[derive(Serialize, Debug)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// A single search result.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone)]
pub struct TavilySearchAdapter {
    http: reqwest::Client,
    api_key: String,
    max_results: u32,
}

impl TavilySearchAdapter {
    pub fn new(http: reqwest::Client, api_key: String, max_results: u32) -> Self {
        Self {
            http,
            api_key,
            max_results,
        }
    }

    /// Runs an advanced-depth search and returns the hits in ranked order.
    pub async fn search(&self, query: &str) -> PortResult<Vec<SearchHit>> {
        let body = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
            search_depth: "advanced",
        };

        let response = self
            .http
            .post(TAVILY_SEARCH_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .error_for_status()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(query, hits = parsed.results.len(), "Web search completed");
        Ok(parsed.results)
    }
}

/// Renders search hits as a numbered context block for the responder.
pub fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("[{}] {} ({})\n{}", i + 1, hit.title, hit.url, hit.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "query": "rust async",
            "results": [
                {"title": "Tokio", "url": "https://tokio.rs", "content": "An async runtime", "score": 0.9},
                {"title": "Docs", "url": "https://doc.rust-lang.org"}
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].title, "Tokio");
        assert_eq!(parsed.results[1].content, "");
    }

    #[test]
    fn test_search_request_serialization() {
        let body = SearchRequest {
            api_key: "key",
            query: "stipend",
            max_results: 5,
            search_depth: "advanced",
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""search_depth":"advanced""#));
        assert!(json.contains(r#""max_results":5"#));
    }

    #[test]
    fn test_format_hits_numbers_each_result() {
        let hits = vec![
            SearchHit {
                title: "A".to_string(),
                url: "https://a.example".to_string(),
                content: " first ".to_string(),
            },
            SearchHit {
                title: "B".to_string(),
                url: "https://b.example".to_string(),
                content: "second".to_string(),
            },
        ];

        assert_eq!(
            format_hits(&hits),
            "[1] A (https://a.example)\nfirst\n\n[2] B (https://b.example)\nsecond"
        );
        assert_eq!(format_hits(&[]), "");
    }
}
